//! Research command - talk to the research backend
//!
//! Failures are reported with a short message and exit code 1; the detail
//! goes to the log (`RUST_LOG=salestax=warn`).

use crate::cmd::{print_json, print_table, yes_no};
use clap::{Args, Subcommand};
use salestax::research::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use salestax::research::{
    default_state, example_questions, ResearchClient, ResearchConfig, CHAT_FAILED,
    EMPTY_KNOWLEDGE_BASE, STATES_FAILED,
};
use std::io::{self, BufRead, Write};
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ResearchCommand {
    /// Backend base URL, up to and including the API version
    #[arg(long, env = "SALESTAX_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "SALESTAX_API_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    #[command(subcommand)]
    action: ResearchAction,
}

#[derive(Subcommand, Debug)]
enum ResearchAction {
    /// States with researched documents
    States {
        #[arg(long)]
        json: bool,
    },
    /// Vector store and agent status
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Ask one question
    Ask {
        query: String,
        /// Scope the question to a state; omitted means all states
        #[arg(short, long)]
        state: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Interactive session; `/state XX` switches state, `q` quits
    Chat {
        /// Starting state (defaults to NY when researched)
        #[arg(short, long)]
        state: Option<String>,
    },
}

#[derive(Tabled)]
struct ResearchedRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Documents")]
    documents: u64,
    #[tabled(rename = "Sales Tax")]
    has_sales_tax: String,
}

impl ResearchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = ResearchConfig::new(&self.api_url, self.timeout)?;
        log::debug!("research backend {}", config.base_url);
        let client = ResearchClient::new(config)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(&client))
    }

    async fn run(&self, client: &ResearchClient) -> anyhow::Result<()> {
        match &self.action {
            ResearchAction::States { json } => {
                let states = match client.researched_states().await {
                    Ok(states) => states,
                    Err(e) => fail(STATES_FAILED, &e),
                };
                if *json {
                    return print_json(&states);
                }
                if states.states.is_empty() {
                    println!("{}", EMPTY_KNOWLEDGE_BASE);
                    return Ok(());
                }
                println!(
                    "{} states researched, {} documents",
                    states.states_researched, states.total_documents
                );
                let rows = states
                    .states
                    .iter()
                    .map(|s| ResearchedRow {
                        code: s.code.clone(),
                        name: s.name.clone(),
                        documents: s.document_count,
                        has_sales_tax: yes_no(s.has_sales_tax),
                    })
                    .collect::<Vec<_>>();
                print_table(rows);
                if !states.states_not_researched.is_empty() {
                    let pending: Vec<&str> = states
                        .states_not_researched
                        .iter()
                        .map(|s| s.code.as_str())
                        .collect();
                    println!("Not yet researched: {}", pending.join(", "));
                }
                Ok(())
            }
            ResearchAction::Status { json } => {
                let status = match client.status().await {
                    Ok(status) => status,
                    Err(e) => fail("Failed to get backend status.", &e),
                };
                if *json {
                    return print_json(&status);
                }
                println!("Status: {}", status.status);
                println!(
                    "Vector store: {} ({} documents)",
                    status.vector_store.kind, status.vector_store.document_count
                );
                println!(
                    "Agent: {} on {}",
                    status.agent.llm_provider, status.agent.vector_store_type
                );
                Ok(())
            }
            ResearchAction::Ask { query, state, json } => {
                let query = query.trim();
                if query.is_empty() {
                    anyhow::bail!("question is empty");
                }
                let response = match client.chat(query, state.as_deref()).await {
                    Ok(response) => response,
                    Err(e) => fail(CHAT_FAILED, &e),
                };
                if *json {
                    return print_json(&response);
                }
                println!("{}", response.response);
                Ok(())
            }
            ResearchAction::Chat { state } => chat(client, state.as_deref()).await,
        }
    }
}

async fn chat(client: &ResearchClient, requested: Option<&str>) -> anyhow::Result<()> {
    let states = match client.researched_states().await {
        Ok(states) => states,
        Err(e) => fail(STATES_FAILED, &e),
    };
    let Some(default) = default_state(&states) else {
        println!("{}", EMPTY_KNOWLEDGE_BASE);
        return Ok(());
    };
    let mut current = requested
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|| default.to_string());

    println!(
        "Ask questions about sales tax for any of the {} researched states.",
        states.states_researched
    );
    print_examples(&current);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("[{}] > ", current);
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        match line {
            "" => continue,
            "q" | "quit" | "exit" => return Ok(()),
            _ => {}
        }
        if let Some(code) = line.strip_prefix("/state") {
            let code = code.trim().to_uppercase();
            if states.states.iter().any(|s| s.code == code) {
                current = code;
                print_examples(&current);
            } else {
                println!("{} has not been researched", code);
            }
            continue;
        }

        match client.chat(line, Some(&current)).await {
            Ok(response) => println!("\n{}\n", response.response),
            Err(e) => {
                log::warn!("{}", e);
                println!("{}", CHAT_FAILED);
            }
        }
    }
}

fn print_examples(state_code: &str) {
    let examples = example_questions(state_code);
    if examples.is_empty() {
        return;
    }
    println!("Try asking:");
    for question in examples {
        println!("  - {}", question);
    }
}

fn fail(message: &str, error: &salestax::research::ResearchError) -> ! {
    log::warn!("{}", error);
    eprintln!("{}", message);
    std::process::exit(1)
}
