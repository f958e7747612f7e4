use path_absolutize::Absolutize;
use rand::Rng;
use std::fs;

pub(crate) struct TestUtils {
    /// A vector of files that will be automatically cleared when the instance is dropped.
    auto_clear_files: Vec<String>,
}

impl TestUtils {
    pub fn new() -> Self {
        Self {
            auto_clear_files: Vec::new(),
        }
    }

    /// Add a file to the automatic file clearing list.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the file to be cleared.
    ///
    fn add_auto_clear_file(&mut self, path: &str) {
        self.auto_clear_files.push(path.to_string());
    }

    /// Get the full path to a random output file path.
    /// These files are created in the operating system's temp directory.
    ///
    /// # Arguments
    ///
    /// * `ext` - The extension of the temporary file.
    /// * `auto_clear` - Whether this file should be automatically cleared after the test has finished.
    ///
    /// `Note:` This path is normalized to avoid creating any issues
    /// with relative paths.
    ///
    pub fn get_out_file(&mut self, ext: &str, auto_clear: bool) -> String {
        let random: u128 = rand::rng().random();

        let mut path = std::env::temp_dir();
        path.push(format!("{}.{}", random, ext));

        let path = path.absolutize().unwrap();
        let path_str = path.to_str().unwrap().to_string();

        // Do we need to automatically delete this file after we are finished?
        if auto_clear {
            self.add_auto_clear_file(&path_str);
        }

        path_str
    }

    /// Write a small RGB reference image to a random temp path.
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the reference image, in pixels.
    /// * `height` - The height of the reference image, in pixels.
    ///
    pub fn create_reference_png(&mut self, width: u32, height: u32) -> String {
        let path = self.get_out_file("png", true);

        let pixels = TestUtils::gradient_pixels(width, height);
        image::save_buffer_with_format(
            &path,
            &pixels,
            width,
            height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .expect("failed to write the reference image");

        path
    }

    /// Generate a deterministic RGB gradient pixel buffer.
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the grid, in pixels.
    /// * `height` - The height of the grid, in pixels.
    ///
    pub fn gradient_pixels(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);

        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 7 % 256) as u8);
                pixels.push((y * 13 % 256) as u8);
                pixels.push(((x + y) * 31 % 256) as u8);
            }
        }

        pixels
    }
}

impl Drop for TestUtils {
    fn drop(&mut self) {
        for f in &self.auto_clear_files {
            let _ = fs::remove_file(f);
        }
    }
}
