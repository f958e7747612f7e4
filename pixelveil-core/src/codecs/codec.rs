use crate::error::Result;

pub trait Codec {
    /// Encode a message into a target image.
    ///
    /// # Arguments
    ///
    /// * `input_img_path` - The path to the carrier image.
    /// * `plaintext` - The message to be encoded within the carrier image.
    /// * `output_img_path` - The path that will be used to store the encoded image.
    ///
    fn encode(
        &mut self,
        input_img_path: &str,
        plaintext: &str,
        output_img_path: &str,
    ) -> Result<()>;

    /// Decode a message from an image.
    ///
    /// # Arguments
    ///
    /// * `encoded_img_path` - The path to the encoded image.
    ///
    fn decode(&mut self, encoded_img_path: &str) -> Result<Decoded>;

    /// Enable or disable a specific configuration flag.
    ///
    /// # Arguments
    ///
    /// * `flag` - The [`ConfigFlags`] option to be configured.
    /// * `state` - A boolean indicating whether the flag should be enabled or disabled.
    ///
    fn set_flag_state(&mut self, flag: ConfigFlags, state: bool);
}

/// A list of configuration flags that are applicable to a [`Codec`].
pub enum ConfigFlags {
    /// Enable or disable the saving of files when encoding.
    OutputFiles,
    /// Enable or disable verbose mode.
    Verbose,
}

/// The outcome of a decode pass over an image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Decoded {
    /// The termination marker was found; the recovered message is complete.
    Complete(String),
    /// Every pixel was scanned without finding the termination marker.
    ///
    /// This is not an error: the image may simply carry no hidden message,
    /// or it may have been re-compressed. Whatever partial content was
    /// accumulated before the scan ran out is included.
    NoTerminator(String),
}
