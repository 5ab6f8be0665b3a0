/// Creates a `String` from anything that implements `Into<String>`.
///
/// # Examples
/// ```
/// use docker_build_push_utils::string;
///
/// let value: String = string!("latest");
/// assert_eq!(value, "latest");
/// ```
#[macro_export]
macro_rules! string {
    ($str:expr) => {
        ::std::string::String::from($str)
    };
}

/// Creates a `Vec<String>` from a list of values
/// that implement `Into<String>`.
///
/// # Examples
/// ```
/// use docker_build_push_utils::string_vec;
///
/// let sha = "1234567";
/// let tags = string_vec!["latest", format!("main-{sha}")];
/// assert_eq!(tags, vec!["latest".to_string(), "main-1234567".to_string()]);
/// ```
#[macro_export]
macro_rules! string_vec {
    ($($string:expr),* $(,)?) => {
        {
            use $crate::string;
            vec![
                $(string!($string),)*
            ]
        }
    };
}
