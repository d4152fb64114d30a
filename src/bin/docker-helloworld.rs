//! Example CLI plugin
//!
//! Install as `docker-helloworld` in a plugin directory, then:
//!
//!   docker helloworld          # Hello World!
//!   docker helloworld goodbye  # Goodbye World!

use std::io::Write;
use std::process::ExitCode;

use clap::Command;

use dockercli::plugins::Metadata;
use dockercli::sdk;

fn main() -> ExitCode {
    let goodbye = Command::new("goodbye").about("goodbye subcommand");
    let cmd = Command::new("helloworld")
        .about("A basic Hello World plugin for tests")
        .subcommand(goodbye);

    let metadata = Metadata {
        vendor: "Docker Inc.".to_string(),
        version: "0.1.0".to_string(),
        ..Default::default()
    };

    sdk::run(cmd, metadata, |_opts, matches, out| match matches.subcommand() {
        Some(("goodbye", _)) => writeln!(out, "Goodbye World!"),
        _ => writeln!(out, "Hello World!"),
    })
}
