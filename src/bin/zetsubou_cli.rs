//! Zetsubou.life command-line tool.
//!
//! Usage:
//!   zetsubou-cli tools list [--category <name>]
//!   zetsubou-cli tools execute <tool-id> <file>... [--options <json>] [--no-wait]
//!   zetsubou-cli jobs list [--status <status>] [--limit <n>]
//!   zetsubou-cli jobs get <job-id>
//!   zetsubou-cli files list [--limit <n>]
//!   zetsubou-cli account info

use anyhow::{anyhow, Context};
use zetsubou::services::{JobFilter, NodeFilter};
use zetsubou::types::NodeKind;
use zetsubou::{FileInput, ZetsubouClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let result = match (args[0].as_str(), args.get(1).map(String::as_str)) {
        ("tools", Some("list")) => cmd_tools_list(&args[2..]).await,
        ("tools", Some("execute")) => cmd_tools_execute(&args[2..]).await,
        ("jobs", Some("list")) => cmd_jobs_list(&args[2..]).await,
        ("jobs", Some("get")) => cmd_jobs_get(&args[2..]).await,
        ("files", Some("list")) => cmd_files_list(&args[2..]).await,
        ("account", Some("info")) => cmd_account_info(&args[2..]).await,
        ("version", _) | ("--version", _) | ("-V", _) => {
            println!("zetsubou-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        ("help", _) | ("--help", _) | ("-h", _) => {
            print_usage();
            Ok(())
        }
        (other, _) => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"zetsubou-cli — Zetsubou.life command-line tool

USAGE:
    zetsubou-cli <COMMAND> [OPTIONS]

COMMANDS:
    tools list [--category <name>]                       List available tools
    tools execute <tool-id> <file>... [--options <json>]
                  [--no-wait]                            Run a tool on local files
    jobs list [--status <status>] [--limit <n>]          List recent jobs
    jobs get <job-id>                                    Show one job
    files list [--limit <n>]                             List VFS files
    account info                                         Show account and storage info
    version                                              Show version information
    help                                                 Show this help message

OPTIONS:
    --api-key <key>        API key (overrides ZETSUBOU_API_KEY)

ENVIRONMENT:
    ZETSUBOU_API_KEY       API key used when --api-key is absent
    ZETSUBOU_BASE_URL      Override the API base URL"#
    );
}

/// Pull `--flag value` out of an argument slice; remaining positionals are
/// returned in order.
fn split_args(args: &[String]) -> (std::collections::HashMap<String, String>, Vec<String>, bool) {
    let mut flags = std::collections::HashMap::new();
    let mut positional = Vec::new();
    let mut no_wait = false;
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if arg == "--no-wait" {
            no_wait = true;
            i += 1;
        } else if let Some(name) = arg.strip_prefix("--") {
            if let Some(value) = args.get(i + 1) {
                flags.insert(name.to_string(), value.clone());
                i += 2;
            } else {
                i += 1;
            }
        } else {
            positional.push(arg.clone());
            i += 1;
        }
    }
    (flags, positional, no_wait)
}

fn client_for(flags: &std::collections::HashMap<String, String>) -> anyhow::Result<ZetsubouClient> {
    let mut builder = ZetsubouClient::builder();
    if let Some(key) = flags.get("api-key") {
        builder = builder.api_key(key.clone());
    }
    if let Ok(base_url) = std::env::var("ZETSUBOU_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    Ok(builder.build()?)
}

async fn cmd_tools_list(args: &[String]) -> anyhow::Result<()> {
    let (flags, _, _) = split_args(args);
    let client = client_for(&flags)?;
    let mut tools = client.tools().list().await?;
    if let Some(category) = flags.get("category") {
        tools.retain(|t| &t.category == category);
    }

    println!("Available tools ({}):", tools.len());
    for tool in tools {
        let mark = if tool.accessible { "+" } else { "-" };
        println!("{mark} {} [{}]", tool.name, tool.id);
        println!("    category: {}  tier: {}", tool.category, tool.required_tier);
        println!("    input: {} -> output: {}", tool.input_type, tool.output_type);
        if let Some(description) = &tool.description {
            println!("    {description}");
        }
    }
    Ok(())
}

async fn cmd_tools_execute(args: &[String]) -> anyhow::Result<()> {
    let (flags, positional, no_wait) = split_args(args);
    let (tool_id, files) = positional
        .split_first()
        .ok_or_else(|| anyhow!("usage: tools execute <tool-id> <file>..."))?;
    if files.is_empty() {
        return Err(anyhow!("at least one input file is required"));
    }

    let options = flags
        .get("options")
        .map(|raw| serde_json::from_str(raw).context("--options must be a JSON object"))
        .transpose()?;

    let client = client_for(&flags)?;
    let inputs = files.iter().map(|f| FileInput::path(f.as_str())).collect();
    let job = client.tools().execute(tool_id, inputs, options, vec![]).await?;
    println!("Job started: {} ({})", job.id, job.status);

    if no_wait {
        println!("Use 'zetsubou-cli jobs get {}' to check status.", job.id);
        return Ok(());
    }

    println!("Waiting for completion...");
    let done = client.jobs().wait_for_completion(&job.id).await?;
    println!("Job completed: {}% done", done.progress);
    if !done.outputs.is_empty() {
        println!("Outputs: {}", done.outputs.join(", "));
        let archive = format!("results_{}.zip", done.id);
        client.jobs().save_results(&done.id, &archive).await?;
        println!("Results downloaded to: {archive}");
    }
    Ok(())
}

async fn cmd_jobs_list(args: &[String]) -> anyhow::Result<()> {
    let (flags, _, _) = split_args(args);
    let client = client_for(&flags)?;

    let filter = JobFilter {
        status: flags
            .get("status")
            .map(|s| serde_json::from_value(serde_json::Value::String(s.clone())))
            .transpose()
            .context("invalid --status (expected pending/running/completed/failed/cancelled)")?,
        limit: flags.get("limit").map(|s| s.parse()).transpose()?.unwrap_or(10),
        ..JobFilter::default()
    };
    let jobs = client.jobs().list(filter).await?;

    println!("Recent jobs ({}):", jobs.len());
    for job in jobs {
        println!("{} [{}] {}% - {}", job.id, job.status, job.progress, job.tool_id);
        if let Some(error) = &job.error {
            println!("    error: {error}");
        }
    }
    Ok(())
}

async fn cmd_jobs_get(args: &[String]) -> anyhow::Result<()> {
    let (flags, positional, _) = split_args(args);
    let job_id = positional.first().ok_or_else(|| anyhow!("usage: jobs get <job-id>"))?;
    let client = client_for(&flags)?;
    let job = client.jobs().get(job_id).await?;

    println!("Job {}", job.id);
    println!("  tool:     {}", job.tool_id);
    println!("  status:   {}", job.status);
    println!("  progress: {}%", job.progress);
    println!("  created:  {}", job.created_at);
    if let Some(completed) = job.completed_at {
        println!("  completed: {completed}");
    }
    if !job.inputs.is_empty() {
        println!("  inputs:   {}", job.inputs.join(", "));
    }
    if !job.outputs.is_empty() {
        println!("  outputs:  {}", job.outputs.join(", "));
    }
    if let Some(error) = &job.error {
        println!("  error:    {error}");
    }
    Ok(())
}

async fn cmd_files_list(args: &[String]) -> anyhow::Result<()> {
    let (flags, _, _) = split_args(args);
    let client = client_for(&flags)?;
    let filter = NodeFilter {
        kind: Some(NodeKind::File),
        limit: flags.get("limit").map(|s| s.parse()).transpose()?.or(Some(20)),
        ..NodeFilter::default()
    };
    let files = client.vfs().list_nodes(filter).await?;

    println!("VFS files ({}):", files.len());
    for file in files {
        let size_mb = file.size_bytes as f64 / (1024.0 * 1024.0);
        println!("{} [{}] {:.2} MB", file.name, file.id, size_mb);
        if let Some(mime) = &file.mime_type {
            println!("    type: {mime}");
        }
    }
    Ok(())
}

async fn cmd_account_info(args: &[String]) -> anyhow::Result<()> {
    let (flags, _, _) = split_args(args);
    let client = client_for(&flags)?;
    let account = client.account().get().await?;
    let quota = client.account().storage_quota().await?;

    println!("Account");
    println!("  username: {}", account.username);
    println!("  email:    {}", account.email);
    println!("  tier:     {}", account.tier);
    println!("  created:  {}", account.created_at);
    println!();
    println!("Storage");
    println!("  used:      {} bytes ({:.1}%)", quota.used_bytes, quota.usage_percent);
    println!("  available: {} bytes", quota.available_bytes);
    println!("  total:     {} bytes", quota.quota_bytes);
    println!("  files:     {}  folders: {}", quota.file_count, quota.folder_count);
    Ok(())
}
