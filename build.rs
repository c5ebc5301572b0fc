#![allow(clippy::indexing_slicing, clippy::exit, clippy::unwrap_used)]
fn main() {
    if std::env::var("PROFILE").unwrap_or_default() == "release" {
        println!("cargo:rustc-env=DEFMT_LOG=off");
    }

    // Firmware link scripts only apply to the badge target.
    if !std::env::var("TARGET").unwrap_or_default().starts_with("xtensa-esp32s3") {
        return;
    }

    linker_hints();
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Re-invoked by the linker on errors; prints a hint for the usual
/// misconfigurations instead of a bare undefined-symbol error.
fn linker_hints() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        let kind = &args[1];
        let what = &args[2];

        if kind != "undefined-symbol" {
            std::process::exit(1);
        }

        match what.as_str() {
            "_defmt_timestamp" => {
                eprintln!();
                eprintln!("💡 `defmt` not found - make sure `defmt.x` is added as a linker script and `esp-println` is linked with `use esp_println as _;`");
                eprintln!();
            }
            "_stack_start" => {
                eprintln!();
                eprintln!("💡 Is the linker script `linkall.x` missing?");
                eprintln!();
            }
            "esp_rtos_initialized" | "esp_rtos_yield_task" | "esp_rtos_task_create" => {
                eprintln!();
                eprintln!("💡 No scheduler running. Make sure `esp_rtos::start` is called before spawning the monitor task.");
                eprintln!();
            }
            _ => (),
        }

        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=-Wl,--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
