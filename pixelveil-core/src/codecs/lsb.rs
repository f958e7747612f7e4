use crate::{
    codecs::{
        codec::{Codec, ConfigFlags, Decoded},
        payload::{PayloadAssembler, PayloadBits},
    },
    error::{Error, Result},
    image_wrapper::ImageWrapper,
    logger::Logger,
    macros::*,
    utilities::misc_utils,
};

/// A codec that hides a message in the least-significant bit of the blue
/// channel of each pixel, one payload bit per pixel, in row-major order.
pub struct StegaLsb {
    /// If the resulting image file should be saved when encoding.
    output_files: bool,
    /// The logger instance for this codec.
    logger: Logger,
}

impl StegaLsb {
    pub fn new() -> Self {
        Self {
            output_files: true,
            logger: Logger::new(false),
        }
    }

    /// The number of payload bits a given image can hold.
    ///
    /// One bit is stored per pixel, so the capacity is simply the total
    /// pixel count.
    ///
    /// # Arguments
    ///
    /// * `img` - A reference to the [`ImageWrapper`] that holds the image.
    ///
    #[inline]
    pub fn capacity_bits(img: &ImageWrapper) -> u64 {
        let (w, h) = img.dimensions();
        w as u64 * h as u64
    }

    /// Embed a message into the blue channel LSBs of an image.
    ///
    /// The message is framed with the terminator byte and written one bit
    /// per pixel, most significant bit first, scanning the grid in row-major
    /// order. Pixels beyond the end of the payload are left untouched, as
    /// are all non-blue channels.
    ///
    /// # Arguments
    ///
    /// * `img` - The [`ImageWrapper`] to encode the message into.
    /// * `message` - The message bytes, which may be empty.
    ///
    /// The capacity check runs before any pixel is modified: on failure the
    /// image is returned to the caller entirely unchanged.
    ///
    pub fn encode_message(img: &mut ImageWrapper, message: &[u8]) -> Result<()> {
        let mut bits = PayloadBits::from_message(message);

        let capacity_bits = StegaLsb::capacity_bits(img);
        if bits.len_bits() > capacity_bits {
            return Err(Error::ImageInsufficientSpace {
                required: bits.len_bytes() as u64,
                available: capacity_bits / 8,
            });
        }

        let (width, height) = img.dimensions();

        // The decoder walks the pixels in exactly this order.
        'scan: for y in 0..height {
            for x in 0..width {
                let Some(bit) = bits.next() else {
                    break 'scan;
                };

                let mut blue = img.get_blue(x, y);
                misc_utils::set_bit_state(&mut blue, 0, bit == 1);
                img.set_blue(x, y, blue);
            }
        }

        Ok(())
    }

    /// Recover a message from the blue channel LSBs of an image.
    ///
    /// The grid is scanned in the same row-major order used when encoding,
    /// reassembling one byte per eight pixels until the terminator byte is
    /// seen ([`Decoded::Complete`]) or every pixel has been visited
    /// ([`Decoded::NoTerminator`]).
    ///
    /// # Arguments
    ///
    /// * `img` - The [`ImageWrapper`] to decode the message from.
    ///
    pub fn decode_message(img: &ImageWrapper) -> Result<Decoded> {
        let mut assembler = PayloadAssembler::new();
        let mut terminated = false;

        let (width, height) = img.dimensions();

        'scan: for y in 0..height {
            for x in 0..width {
                let bit = misc_utils::is_bit_set(&img.get_blue(x, y), 0) as u8;
                if assembler.push_bit(bit) {
                    terminated = true;
                    break 'scan;
                }
            }
        }

        let bytes = assembler.into_message();
        if terminated {
            let text = unwrap_or_return_err!(String::from_utf8(bytes), Error::DecodeStringInvalid);
            Ok(Decoded::Complete(text))
        } else {
            // The partial content may well be garbage, so it is converted
            // lossily rather than rejected.
            Ok(Decoded::NoTerminator(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        }
    }

    /// Loads an image from a file and validates that it is suitable for
    /// steganography.
    ///
    /// # Arguments
    ///
    /// * `file_path` - The path to the image file.
    /// * `read_only` - Whether the image should be opened in a read-only state.
    ///
    fn load_image(file_path: &str, read_only: bool) -> Result<ImageWrapper> {
        let img = ImageWrapper::load_from_file(file_path, read_only)?;

        StegaLsb::validate_image(&img)?;

        Ok(img)
    }

    /// Validate if the image file can be used.
    ///
    /// # Arguments
    ///
    /// * `img` - A reference to the [`ImageWrapper`] that holds the image.
    ///
    fn validate_image(img: &ImageWrapper) -> Result<()> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(Error::ImageDimensionsInvalid);
        }

        Ok(())
    }
}

impl Codec for StegaLsb {
    fn encode(
        &mut self,
        input_img_path: &str,
        plaintext: &str,
        output_img_path: &str,
    ) -> Result<()> {
        let mut img = StegaLsb::load_image(input_img_path, false)?;

        let (w, h) = img.dimensions();
        self.logger.log(&format!(
            "Loaded a {w}x{h} carrier image with a capacity of {} bytes.",
            StegaLsb::capacity_bits(&img) / 8
        ));

        StegaLsb::encode_message(&mut img, plaintext.as_bytes())?;

        if !self.output_files {
            return Ok(());
        }

        // Attempt to save the modified image.
        img.save_lossless(output_img_path)
    }

    fn decode(&mut self, encoded_img_path: &str) -> Result<Decoded> {
        let img = StegaLsb::load_image(encoded_img_path, true)?;

        self.logger.log(&format!(
            "Scanning {} pixels for an embedded message.",
            StegaLsb::capacity_bits(&img)
        ));

        StegaLsb::decode_message(&img)
    }

    fn set_flag_state(&mut self, flag: ConfigFlags, state: bool) {
        match flag {
            ConfigFlags::OutputFiles => {
                self.output_files = state;
            }
            ConfigFlags::Verbose => {
                self.logger.set_verbose(state);
            }
        }
    }
}

impl Default for StegaLsb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests_encode_decode {
    use crate::{
        codecs::codec::{Codec, ConfigFlags, Decoded},
        error::Error,
        image_wrapper::ImageWrapper,
        utilities::{file_utils, test_utils::TestUtils},
    };

    use super::StegaLsb;

    // The generic text used to test encoding and decoding.
    const TEXT: &str = "The five boxing wizards jump quickly.";

    /// Create a zeroed RGB grid of the given dimensions.
    fn blank_grid(width: u32, height: u32) -> ImageWrapper {
        ImageWrapper::from_pixels(width, height, vec![0; width as usize * height as usize * 3])
    }

    #[test]
    fn test_roundtrip() {
        let mut img = blank_grid(10, 10);

        StegaLsb::encode_message(&mut img, b"hi").expect("failed to encode the message");
        let r = StegaLsb::decode_message(&img).expect("failed to decode the message");

        assert_eq!(r, Decoded::Complete("hi".to_string()));
    }

    #[test]
    fn test_roundtrip_unicode() {
        let mut img = blank_grid(16, 16);

        let text = "Schrödinger ✓";
        StegaLsb::encode_message(&mut img, text.as_bytes()).expect("failed to encode the message");
        let r = StegaLsb::decode_message(&img).expect("failed to decode the message");

        assert_eq!(r, Decoded::Complete(text.to_string()));
    }

    #[test]
    fn test_empty_message_roundtrip() {
        let mut img = blank_grid(10, 10);

        StegaLsb::encode_message(&mut img, b"").expect("failed to encode the message");
        let r = StegaLsb::decode_message(&img).expect("failed to decode the message");

        assert_eq!(r, Decoded::Complete(String::new()));
    }

    #[test]
    fn test_payload_bits_land_in_blue_lsbs() {
        // A 10x10 image holds 100 bits; "hi" plus the terminator needs 24.
        let mut img = blank_grid(10, 10);

        StegaLsb::encode_message(&mut img, b"hi").expect("failed to encode the message");

        // 'h' = 0x68, 'i' = 0x69, '~' = 0x7e, most significant bit first.
        let expected: [u8; 24] = [
            0, 1, 1, 0, 1, 0, 0, 0, // h
            0, 1, 1, 0, 1, 0, 0, 1, // i
            0, 1, 1, 1, 1, 1, 1, 0, // ~
        ];

        for (i, want) in expected.iter().enumerate() {
            let (x, y) = (i as u32 % 10, i as u32 / 10);
            assert_eq!(
                img.get_blue(x, y) & 1,
                *want,
                "wrong bit at pixel index {i}"
            );
        }

        // Every pixel past the end of the payload is untouched.
        for i in expected.len()..100 {
            let (x, y) = (i as u32 % 10, i as u32 / 10);
            assert_eq!(img.get_blue(x, y), 0, "pixel index {i} was modified");
        }
    }

    #[test]
    fn test_non_blue_channels_untouched() {
        let pixels = TestUtils::gradient_pixels(10, 10);
        let mut img = ImageWrapper::from_pixels(10, 10, pixels.clone());

        StegaLsb::encode_message(&mut img, TEXT.as_bytes()).expect("failed to encode the message");

        for (i, (before, after)) in pixels.iter().zip(img.bytes()).enumerate() {
            if i % 3 == 2 {
                // Blue byte: only the LSB may differ.
                assert_eq!(before & 0xfe, after & 0xfe, "blue high bits changed at {i}");
            } else {
                assert_eq!(before, after, "non-blue channel changed at byte {i}");
            }
        }
    }

    #[test]
    fn test_capacity_exact_fit() {
        // "hi" plus the terminator is exactly 24 bits; a 6x4 grid has 24 pixels.
        let mut img = blank_grid(6, 4);

        StegaLsb::encode_message(&mut img, b"hi").expect("failed to encode the message");
        let r = StegaLsb::decode_message(&img).expect("failed to decode the message");

        assert_eq!(r, Decoded::Complete("hi".to_string()));
    }

    #[test]
    fn test_capacity_exceeded() {
        // One pixel short of the 24 bits the payload needs.
        let mut img = blank_grid(23, 1);

        let r = StegaLsb::encode_message(&mut img, b"hi");
        assert_eq!(
            r,
            Err(Error::ImageInsufficientSpace {
                required: 3,
                available: 2,
            })
        );
    }

    #[test]
    fn test_no_mutation_on_capacity_failure() {
        let pixels = TestUtils::gradient_pixels(23, 1);
        let mut img = ImageWrapper::from_pixels(23, 1, pixels.clone());

        let r = StegaLsb::encode_message(&mut img, b"hi");
        assert!(r.is_err());
        assert_eq!(
            img.bytes(),
            &pixels[..],
            "a failed encode must leave the image unchanged"
        );
    }

    #[test]
    fn test_decode_untouched_grid() {
        // All blue LSBs are zero, so no byte can ever match the terminator.
        let img = blank_grid(4, 4);

        let r = StegaLsb::decode_message(&img).expect("failed to decode the message");

        // 16 pixels reassemble into two NUL bytes.
        assert_eq!(r, Decoded::NoTerminator("\u{0}\u{0}".to_string()));
    }

    #[test]
    fn test_reencode_is_idempotent() {
        let mut first = ImageWrapper::from_pixels(10, 10, TestUtils::gradient_pixels(10, 10));
        StegaLsb::encode_message(&mut first, TEXT.as_bytes())
            .expect("failed to encode the message");

        let mut second = first.clone();
        StegaLsb::encode_message(&mut second, TEXT.as_bytes())
            .expect("failed to re-encode the message");

        assert_eq!(
            first.bytes(),
            second.bytes(),
            "re-encoding the same message must not change the bit pattern"
        );
    }

    #[test]
    fn test_terminator_within_message_truncates() {
        let mut img = blank_grid(10, 10);

        StegaLsb::encode_message(&mut img, b"ab~cd").expect("failed to encode the message");
        let r = StegaLsb::decode_message(&img).expect("failed to decode the message");

        // The protocol does not escape the terminator, so decoding stops at
        // the first '~' within the message.
        assert_eq!(r, Decoded::Complete("ab".to_string()));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut img = blank_grid(10, 10);

        StegaLsb::encode_message(&mut img, &[0xff, 0xfe]).expect("failed to encode the message");
        let r = StegaLsb::decode_message(&img);

        assert_eq!(r, Err(Error::DecodeStringInvalid));
    }

    #[test]
    fn test_encode_decode_files() {
        let mut tu = TestUtils::new();

        let ref_path = tu.create_reference_png(32, 32);
        let enc_path = tu.get_out_file("png", true);

        let mut stega = StegaLsb::new();
        stega
            .encode(&ref_path, TEXT, &enc_path)
            .expect("failed to encode data into the image file");

        assert!(
            file_utils::path_exists(&enc_path),
            "file not written to disk"
        );

        let r = stega
            .decode(&enc_path)
            .expect("failed to decode data from the image file");

        assert_eq!(r, Decoded::Complete(TEXT.to_string()));
    }

    #[test]
    fn test_encode_missing_input_file() {
        let mut tu = TestUtils::new();
        let enc_path = tu.get_out_file("png", true);

        let mut stega = StegaLsb::new();
        let r = stega.encode("this-file-does-not-exist.png", TEXT, &enc_path);

        assert_eq!(r, Err(Error::PathInvalid));
        assert!(
            !file_utils::path_exists(&enc_path),
            "no output file may be written on failure"
        );
    }

    #[test]
    fn test_encode_output_files_disabled() {
        let mut tu = TestUtils::new();

        let ref_path = tu.create_reference_png(16, 16);
        let enc_path = tu.get_out_file("png", true);

        let mut stega = StegaLsb::new();
        stega.set_flag_state(ConfigFlags::OutputFiles, false);
        stega
            .encode(&ref_path, "hidden", &enc_path)
            .expect("failed to encode data");

        assert!(
            !file_utils::path_exists(&enc_path),
            "no file may be written with output files disabled"
        );
    }

    #[test]
    fn test_decode_file_without_message() {
        let mut tu = TestUtils::new();

        // A small reference image that has never been touched by the encoder.
        let ref_path = tu.create_reference_png(4, 2);

        let mut stega = StegaLsb::new();
        let r = stega
            .decode(&ref_path)
            .expect("failed to decode data from the image file");

        assert!(
            matches!(r, Decoded::NoTerminator(_)),
            "an untouched image must not produce a complete decode"
        );
    }
}
