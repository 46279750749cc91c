fn main() {
    // Load .env file for WiFi and device configuration
    load_env_config();

    linker_be_nice();
    // make sure linkall.x is the last linker script (otherwise might cause problems with flip-link)
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Load environment configuration from .env file
/// Environment variables take priority over .env file values
fn load_env_config() {
    use std::env;
    use std::path::Path;

    // Tell cargo to rerun this build script if .env file changes
    println!("cargo:rerun-if-changed=.env");

    // Tell cargo to rerun if environment variables change
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=DEVICE_HOSTNAME");

    // Try to load .env file if it exists
    if Path::new(".env").exists() {
        match dotenvy::dotenv() {
            Ok(_) => println!("cargo:warning=Loaded .env file"),
            Err(e) => println!("cargo:warning=Failed to load .env file: {}", e),
        }
    }

    // Get the configuration with fallbacks
    // Note: We need to handle the case where env vars are set to empty strings
    let wifi_ssid = env::var("WIFI_SSID")
        .unwrap_or_else(|_| String::new())
        .trim()
        .to_string();
    let wifi_password = env::var("WIFI_PASSWORD")
        .unwrap_or_else(|_| String::new())
        .trim()
        .to_string();
    // Optional: empty means the board default hostname
    let device_hostname = env::var("DEVICE_HOSTNAME")
        .unwrap_or_else(|_| String::new())
        .trim()
        .to_string();

    // Set environment variables for the compilation
    println!("cargo:rustc-env=WIFI_SSID={}", wifi_ssid);
    println!("cargo:rustc-env=WIFI_PASSWORD={}", wifi_password);
    println!("cargo:rustc-env=DEVICE_HOSTNAME={}", device_hostname);

    // Print status
    if wifi_ssid.is_empty() {
        println!("cargo:warning=WIFI_SSID is empty - WiFi will not be configured");
    } else {
        println!("cargo:warning=WIFI_SSID configured: {}", wifi_ssid);
    }

    if wifi_password.is_empty() {
        println!("cargo:warning=WIFI_PASSWORD is empty - WiFi will not be configured");
    }

    if device_hostname.is_empty() {
        println!("cargo:warning=DEVICE_HOSTNAME is empty - using board default hostname");
    }
}

fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        let kind = &args[1];
        let what = &args[2];

        match kind.as_str() {
            "undefined-symbol" => match what.as_str() {
                "_stack_start" => {
                    eprintln!();
                    eprintln!("💡 Is the linker script `linkall.x` missing?");
                    eprintln!();
                }
                "esp_wifi_preempt_enable"
                | "esp_wifi_preempt_yield_task"
                | "esp_wifi_preempt_task_create" => {
                    eprintln!();
                    eprintln!("💡 `esp-wifi` has no scheduler enabled. Make sure you have the `builtin-scheduler` feature enabled, or that you provide an external scheduler.");
                    eprintln!();
                }
                _ => (),
            },
            // we don't have anything helpful for "missing-lib" yet
            _ => {
                std::process::exit(1);
            }
        }

        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
