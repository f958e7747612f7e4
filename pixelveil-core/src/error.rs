use core::fmt;

/// Result with internal [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The decoded message isn't valid.
    DecodeStringInvalid,
    /// Invalid image dimensions.
    ImageDimensionsInvalid,
    /// There is insufficient space within the image to encode the specified data.
    ImageInsufficientSpace {
        /// The number of bytes the payload requires.
        required: u64,
        /// The number of payload bytes the image can hold.
        available: u64,
    },
    /// There was an error when attempting to load an image file.
    ImageOpening,
    /// There was an error when attempting to save an image file.
    ImageSaving(String),
    /// The specified path is invalid.
    PathInvalid,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DecodeStringInvalid => {
                f.write_str("The decoded data isn't valid Unicode.")
            }
            Error::ImageDimensionsInvalid => {
                f.write_str("Invalid image dimensions: the image must be at least one pixel in size.")
            }
            Error::ImageInsufficientSpace {
                required,
                available,
            } => {
                write!(
                    f,
                    "There is insufficient space to encode the data within the image. Capacity (bytes): {available}, required bytes: {required}."
                )
            }
            Error::ImageOpening => f.write_str("Error when attempting to load the image."),
            Error::ImageSaving(s) => f.write_str(s),
            Error::PathInvalid => f.write_str("The path is invalid or does not exist."),
        }
    }
}

impl std::error::Error for Error {}
