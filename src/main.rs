use anyhow::{Result, bail};
use clap::Parser;
use std::io::{self, Write};

use imara::cli::Args;
use imara::launch;
use imara::logging::init_tracing;

fn read_topic_from_stdin() -> Result<String> {
    print!("\nEnter your research topic: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let topic = line.trim().to_string();
    if topic.is_empty() {
        bail!("未输入研究主题");
    }
    Ok(topic)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let topic = args.topic();
    let config = args.into_config()?;
    init_tracing(config.verbose);

    let rule = "=".repeat(70);
    println!("{}", rule);
    println!("       IMARA - Intelligent Multi-Agent Research Assistant");
    println!("{}", rule);

    let topic = match topic {
        Some(topic) => topic,
        None => read_topic_from_stdin()?,
    };

    launch(&config, &topic).await?;
    Ok(())
}
