// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
                       _     _
  __ _ _ __ __ _ _ __ | |__ | | ___ _ __  ___
 / _` | '__/ _` | '_ \| '_ \| |/ _ \ '_ \/ __|
| (_| | | | (_| | |_) | | | | |  __/ | | \__ \
 \__, |_|  \__,_| .__/|_| |_|_|\___|_| |_|___/
 |___/          |_|

    Graph image → equation, step by step
"#;
    println!("{}", banner);
}
