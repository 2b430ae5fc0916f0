use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Largest possible channel sum of an 8-bit RGB color (3 * 255).
const MAX_CHANNEL_SUM: u32 = 765;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("hue_factors.rs");
    let mut file = File::create(&dest_path).unwrap();

    // Generate HUE_FACTORS LUT (766 entries)
    writeln!(file, "/// Reciprocal table for chromaticity normalization").unwrap();
    writeln!(file, "/// Index: r + g + b, Value: 65535 / index (0 at index 0)").unwrap();
    writeln!(
        file,
        "pub static HUE_FACTORS: [i64; {}] = [",
        MAX_CHANNEL_SUM + 1
    )
    .unwrap();
    for i in 0..=MAX_CHANNEL_SUM {
        let factor = if i == 0 { 0 } else { 65535 / i };
        if i > 0 && i % 12 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, "    {},", factor).unwrap();
    }
    writeln!(file, "\n];").unwrap();

    // Rerun if build.rs changes
    println!("cargo::rerun-if-changed=build.rs");
}
