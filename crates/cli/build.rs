use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("corkscrew")
        .version("1.0.0")
        .author("Corkscrew Contributors")
        .about("Crawl product pages into structured records")
        .arg(clap::arg!(-v --verbose "Enable verbose progress output").global(true))
        .subcommand(
            clap::Command::new("crawl")
                .about("Crawl collection pages with a site configuration and write a CSV")
                .arg(clap::arg!(--site <NAME> "Site configuration name").required(true))
                .arg(
                    clap::arg!(--product <TYPE> "Product configuration name").required(true),
                )
                .arg(
                    clap::arg!(--collections <FILE> "File with collection page URLs, one per line")
                        .required(true)
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    clap::arg!(-o --output <FILE> "Output CSV file")
                        .required(true)
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(clap::arg!(--limit <NUM> "Max products to crawl"))
                .arg(
                    clap::arg!(--config_dir <DIR> "Custom configuration directory")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            clap::Command::new("extract")
                .about("Extract one product page and print the record")
                .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
                .arg(clap::arg!(--url <URL> "Originating page URL when reading from a file or stdin"))
                .arg(clap::arg!(--site <NAME> "Site configuration name (omit for pure auto-detection)"))
                .arg(clap::arg!(--product <TYPE> "Product configuration name"))
                .arg(
                    clap::arg!(--config_dir <DIR> "Custom configuration directory")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    clap::arg!(-f --format <FORMAT> "Output format (json, csv)")
                        .default_value("json")
                        .value_parser(["json", "csv"]),
                )
                .arg(
                    clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
                .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests")),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "corkscrew", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "corkscrew", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "corkscrew", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "corkscrew", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
