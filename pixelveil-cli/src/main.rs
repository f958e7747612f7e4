#![crate_name = "pixelveil_cli"]
mod error;
use crate::error::{Error, Result};
use clap::{Parser, Subcommand};
use pixelveil_core::codecs::{
    codec::{Codec, ConfigFlags, Decoded},
    lsb::StegaLsb,
};
use simple_logger::SimpleLogger;
use std::io::{stdin, stdout, Write};

/// A blue-channel LSB steganography tool
#[derive(Parser)]
#[command(name = "pixelveil")]
#[command(about = "Hide a text message inside an image", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Enable verbose output.
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a message into a target image.
    #[command(visible_alias = "e")]
    Encode {
        /// Carrier image path.
        #[arg(value_name = "INPUT_IMAGE")]
        input_image: Option<String>,
        /// Output image path (always written as PNG).
        #[arg(value_name = "OUTPUT_IMAGE")]
        output_image: Option<String>,
        /// Text to encode.
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },
    /// Decode a message from an encoded image.
    #[command(visible_alias = "d")]
    Decode {
        /// Encoded image path.
        #[arg(value_name = "ENCODED_IMAGE")]
        encoded_image: Option<String>,
    },
    /// Show example commands.
    Examples,
}

fn main() {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init()
        .unwrap();

    let result = match cli.command {
        Some(Commands::Encode {
            input_image,
            output_image,
            text,
        }) => run_encode(input_image, output_image, text, cli.verbose),

        Some(Commands::Decode { encoded_image }) => run_decode(encoded_image, cli.verbose),

        Some(Commands::Examples) => {
            show_examples();
            Ok(())
        }

        None => run_interactive(cli.verbose),
    };

    if let Err(e) = result {
        show_abort_message(e);
    }
}

/// Run the interactive menu, in the style of the original prompt loop.
fn run_interactive(verbose: bool) -> Result<()> {
    println!("===== Image Steganography =====");
    println!("1. Encode a message");
    println!("2. Decode a message");

    let choice = prompt("Choose an option (1/2): ")?;
    match choice.trim() {
        "1" => run_encode(None, None, None, verbose),
        "2" => run_decode(None, verbose),
        _ => Err(Error::InvalidChoice),
    }
}

/// Handle the encode command, prompting for any missing arguments.
fn run_encode(
    input_image: Option<String>,
    output_image: Option<String>,
    text: Option<String>,
    verbose: bool,
) -> Result<()> {
    let input_image = resolve_arg(input_image, "Enter the input image path: ")?;
    let output_image = resolve_arg(output_image, "Enter the output image path (saved as PNG): ")?;
    let text = resolve_arg(text, "Enter the message to hide: ")?;

    let mut codec = create_codec(verbose);
    match codec.encode(&input_image, &text, &output_image) {
        Ok(_) => {
            println!("The message has been successfully encoded. Saved to: {output_image}");
            Ok(())
        }
        Err(e) => Err(Error::Encoding(e.to_string())),
    }
}

/// Handle the decode command, prompting for any missing arguments.
fn run_decode(encoded_image: Option<String>, verbose: bool) -> Result<()> {
    let encoded_image = resolve_arg(encoded_image, "Enter the encoded image path: ")?;

    let mut codec = create_codec(verbose);
    match codec.decode(&encoded_image) {
        Ok(Decoded::Complete(text)) => {
            print_decoded_text(&text);
            Ok(())
        }
        Ok(Decoded::NoTerminator(partial)) => {
            println!("No termination marker was found within the image.");
            if !partial.is_empty() {
                println!("Partial content (if any): {partial}");
            }
            Ok(())
        }
        Err(e) => Err(Error::Decoding(e.to_string())),
    }
}

/// Create a codec instance with the requested flags applied.
fn create_codec(verbose: bool) -> StegaLsb {
    let mut codec = StegaLsb::new();
    if verbose {
        codec.set_flag_state(ConfigFlags::Verbose, true);
    }
    codec
}

/// Print decoded text between separator rules.
fn print_decoded_text(plaintext: &str) {
    println!("{}", "-".repeat(32));
    println!("{plaintext}");
    println!("{}", "-".repeat(32));
}

/// Use the argument value if present, otherwise prompt for one.
fn resolve_arg(arg: Option<String>, prompt_text: &str) -> Result<String> {
    match arg {
        Some(v) => Ok(v),
        None => Ok(prompt(prompt_text)?.trim().to_string()),
    }
}

/// Display a prompt and read a line of text from stdin.
fn prompt(text: &str) -> Result<String> {
    print!("{text}");
    if stdout().flush().is_err() {
        return Err(Error::StdinRead);
    }

    let mut input_string = String::new();
    if stdin().read_line(&mut input_string).is_err() {
        return Err(Error::StdinRead);
    }

    Ok(input_string)
}

/// Display an error message and abort.
fn show_abort_message(error: Error) {
    eprintln!("Error: {error}");
    std::process::exit(1);
}

/// Show the example command line arguments.
fn show_examples() {
    let split = "-".repeat(60);
    let bold = "\x1b[1m";
    let reset = "\x1b[0m";

    println!("\n{split}");
    println!("{bold}ENCODING EXAMPLES{reset}");
    println!("{split}");

    println!("{bold}Encode a message into an image:{reset}");
    println!("  pixelveil encode carrier.png encoded.png \"A very important message.\"\n");

    println!("{bold}Prompt for the message instead of passing it as an argument:{reset}");
    println!("  pixelveil encode carrier.png encoded.png\n");

    println!("{split}");
    println!("{bold}DECODING EXAMPLES{reset}");
    println!("{split}");

    println!("{bold}Decode a message from an image:{reset}");
    println!("  pixelveil decode encoded.png\n");

    println!("{split}");
    println!("{bold}NOTES{reset}");
    println!("{split}");

    println!("Run pixelveil with no arguments for the interactive menu.");
    println!("The output image is always written as a PNG: any lossy format would destroy the encoded message.");
}
