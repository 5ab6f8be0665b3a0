// Paths
pub const DEFAULT_BUILD_DIR: &str = ".";
pub const DEFAULT_DOCKERFILE: &str = "Dockerfile";
pub const LOG_DIR: &str = ".cache/docker-build-push";

// Git references
pub const REF_TAGS_PREFIX: &str = "refs/tags/";
pub const REF_HEADS_PREFIX: &str = "refs/heads/";
pub const REF_PULL_PREFIX: &str = "refs/pull/";

// Tags
pub const LATEST_TAG: &str = "latest";
pub const PR_TAG_PREFIX: &str = "pr";
pub const SHORT_SHA_LEN: usize = 7;
pub const MAX_SLUG_LEN: usize = 120;

// Registries
pub const GITHUB_REGISTRY_HOSTS: [&str; 2] = ["ghcr.io", "docker.pkg.github.com"];
pub const ECR_HOST_MARKER: &str = "amazonaws";
pub const ECR_REGION_START: &str = "ecr.";
pub const ECR_REGION_END: &str = ".amazonaws";
pub const ECR_USERNAME: &str = "AWS";

// Docker vars
pub const DOCKER_BUILDKIT: &str = "DOCKER_BUILDKIT";

// Action inputs
pub const INPUT_ADD_LATEST: &str = "INPUT_ADDLATEST";
pub const INPUT_ADD_TIMESTAMP: &str = "INPUT_ADDTIMESTAMP";
pub const INPUT_BUILD_ARGS: &str = "INPUT_BUILDARGS";
pub const INPUT_DIRECTORY: &str = "INPUT_DIRECTORY";
pub const INPUT_DOCKERFILE: &str = "INPUT_DOCKERFILE";
pub const INPUT_ENABLE_BUILDKIT: &str = "INPUT_ENABLEBUILDKIT";
pub const INPUT_GITHUB_OWNER: &str = "INPUT_GITHUBORGOVERRIDE";
pub const INPUT_IMAGE: &str = "INPUT_IMAGE";
pub const INPUT_LABELS: &str = "INPUT_LABELS";
pub const INPUT_MULTI_PLATFORM: &str = "INPUT_MULTIPLATFORM";
pub const INPUT_NUMERIC_TIMESTAMP: &str = "INPUT_NUMERICTIMESTAMP";
pub const INPUT_OVERRIDE_DRIVER: &str = "INPUT_OVERRIDEDRIVER";
pub const INPUT_PASSWORD: &str = "INPUT_PASSWORD";
pub const INPUT_PLATFORM: &str = "INPUT_PLATFORM";
pub const INPUT_REGISTRY: &str = "INPUT_REGISTRY";
pub const INPUT_SKIP_PUSH: &str = "INPUT_SKIPPUSH";
pub const INPUT_SSH: &str = "INPUT_SSH";
pub const INPUT_TAGS: &str = "INPUT_TAGS";
pub const INPUT_TARGET: &str = "INPUT_TARGET";
pub const INPUT_USERNAME: &str = "INPUT_USERNAME";

// Action outputs
pub const OUTPUT_IMAGE_FULL_NAME: &str = "imageFullName";
pub const OUTPUT_IMAGE_NAME: &str = "imageName";
pub const OUTPUT_TAGS: &str = "tags";

// GitHub CI vars
pub const GITHUB_ACTIONS: &str = "GITHUB_ACTIONS";
pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";
pub const GITHUB_REF: &str = "GITHUB_REF";
pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const GITHUB_SHA: &str = "GITHUB_SHA";

// Misc
pub const BUILD_OUTPUT_BUFFER_MAX: usize = 50 * 1024 * 1024;
pub const DOCKER_BUILD_PUSH: &str = "docker-build-push";
