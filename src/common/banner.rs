use colored::*;

pub fn show() {
    let banner = r#"
      ___ _ __ ___  __| |___ _ __  _ __ __ _ _   _
     / __| '__/ _ \/ _` / __| '_ \| '__/ _` | | | |
    | (__| | |  __/ (_| \__ \ |_) | | | (_| | |_| |
     \___|_|  \___|\__,_|___/ .__/|_|  \__,_|\__, |
                            |_|              |___/
    "#;

    println!("{}", banner.bright_red());
    println!("    {}", "Login/password tester for HTTP, FTP and SSH services".bright_yellow());
    println!("    {}", "Only test systems you are authorised to assess".bright_yellow());
    println!("    {}", format!("Version: {}", env!("CARGO_PKG_VERSION")).bright_yellow());
    println!();
}
