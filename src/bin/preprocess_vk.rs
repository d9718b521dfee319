use std::env;
use std::fs;
use std::process;

use groth16_rust_verifier::vk::{preprocess_vk_json, VK_FIXED_LEN};

const USAGE: &str = "usage: preprocess_vk <verification_key.json> <output_path>";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let [input, output] = args.as_slice() else {
        eprintln!("{USAGE}");
        process::exit(1);
    };

    let contents = match fs::read_to_string(input) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("failed to read {input}: {err}");
            process::exit(1);
        }
    };

    let bytes = match preprocess_vk_json(&contents) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("failed to parse {input}: {err}");
            process::exit(1);
        }
    };

    if let Err(err) = fs::write(output, &bytes) {
        eprintln!("failed to write {output}: {err}");
        process::exit(1);
    }
    println!(
        "wrote {} bytes ({} public inputs) to {output}",
        bytes.len(),
        (bytes.len() - VK_FIXED_LEN) / 64 - 1
    );
}
