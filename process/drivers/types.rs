use clap::ValueEnum;
use docker_build_push_utils::constants::GITHUB_ACTIONS;
use log::trace;

#[cfg(not(test))]
use docker_build_push_utils::has_env_var;

#[cfg(test)]
use docker_build_push_utils::test_utils::has_env_var;

pub(super) trait DetermineDriver<T> {
    fn determine_driver(&mut self) -> T;
}

/// The CI system the tool reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CiDriverType {
    Local,
    Github,
}

impl DetermineDriver<CiDriverType> for Option<CiDriverType> {
    fn determine_driver(&mut self) -> CiDriverType {
        trace!("CiDriverType::determine_driver()");

        *self.get_or_insert(if has_env_var(GITHUB_ACTIONS) {
            CiDriverType::Github
        } else {
            CiDriverType::Local
        })
    }
}
