use core::fmt;

/// Result with internal [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// An error occurred while attempting to decode data from an image.
    Decoding(String),
    /// An error occurred while attempting to encode data into an image.
    Encoding(String),
    /// The selected menu option was not recognized.
    InvalidChoice,
    /// Unable to read a line from standard input.
    StdinRead,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::Decoding(s) => s,
            Error::Encoding(s) => s,
            Error::InvalidChoice => "The selected option is invalid.",
            Error::StdinRead => "Unable to read from standard input.",
        })
    }
}

impl std::error::Error for Error {}
