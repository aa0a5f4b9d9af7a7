// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MEDAGENTX SERVER / CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Uso:
//   medagentx-server                          (servidor em 127.0.0.1:5000)
//   medagentx-server --port=8080 --parallel
//   medagentx-server --analyze relatorio.txt  (análise única, sem servidor)
//   medagentx-server --analyze -              (lê o relatório do stdin)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use anyhow::Context;
use medagentx::config::parse_port;
use medagentx::server::{start_server, AppState};
use medagentx::{
    install_panic_hook, load_llm_config, load_pipeline_config, load_server_config, ExecutionMode,
    GroqClient, LlmClient, MedicalTeam, TeamAnalysis,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Argumentos de linha de comando (sobrescrevem o .env)
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    host: Option<String>,
    port: Option<u16>,
    secret: Option<String>,
    parallel: bool,
    analyze: Option<String>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if let Some(host) = arg.strip_prefix("--host=") {
            cli.host = Some(host.to_string());
        } else if let Some(port) = arg.strip_prefix("--port=") {
            cli.port = Some(parse_port(port).map_err(|e| e.to_string())?);
        } else if let Some(secret) = arg.strip_prefix("--secret=") {
            cli.secret = Some(secret.to_string());
        } else if arg == "--parallel" {
            cli.parallel = true;
        } else if arg == "--analyze" {
            let path = iter
                .next()
                .ok_or_else(|| "--analyze requer um arquivo (ou '-')".to_string())?;
            cli.analyze = Some(path.clone());
        } else if arg == "--help" || arg == "-h" {
            cli.help = true;
        } else {
            return Err(format!("Argumento desconhecido: {}", arg));
        }
    }

    Ok(cli)
}

fn print_usage(program: &str) {
    eprintln!("MedAgentX v{}", medagentx::VERSION);
    eprintln!();
    eprintln!("Uso: {} [opções]", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --host=<host>        Host de bind (padrão: 127.0.0.1)");
    eprintln!("  --port=<porta>       Porta (padrão: 5000)");
    eprintln!("  --secret=<token>     Exige Authorization: Bearer <token>");
    eprintln!("  --parallel           Executa os especialistas em paralelo");
    eprintln!("  --analyze <arquivo>  Analisa um relatório e sai ('-' = stdin)");
}

/// Tenta carregar o arquivo .env do diretório atual ou do pai
fn load_dotenv() {
    for path in [PathBuf::from(".env"), PathBuf::from("../.env")] {
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(_) => {
                    eprintln!("✓ Carregado .env de: {:?}", path);
                    return;
                }
                Err(e) => eprintln!("⚠ Erro ao carregar {:?}: {}", path, e),
            }
        }
    }
    eprintln!("⚠ Nenhum arquivo .env encontrado. Certifique-se de que GROQ_API_KEY está definida.");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    install_panic_hook();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("medagentx-server");
    let cli = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("✗ {}", e);
            eprintln!();
            print_usage(program);
            std::process::exit(2);
        }
    };
    if cli.help {
        print_usage(program);
        return Ok(());
    }

    let llm_config = load_llm_config().context("configuração do LLM")?;
    let mut pipeline_config = load_pipeline_config();
    if cli.parallel {
        pipeline_config.mode = ExecutionMode::Parallel;
    }

    let llm: Arc<dyn LlmClient> = Arc::new(GroqClient::from_config(&llm_config));
    log::info!(
        "🩺 Modelo: {} | especialistas: {} | campos ausentes: {}",
        llm.model(),
        pipeline_config.mode,
        pipeline_config.missing_fields
    );
    let team = MedicalTeam::new(llm, pipeline_config);

    if let Some(path) = cli.analyze {
        return run_analyze_mode(&team, &path).await;
    }

    let mut server_config = load_server_config().context("configuração do servidor")?;
    if let Some(host) = cli.host {
        server_config.host = host;
    }
    if let Some(port) = cli.port {
        server_config.port = port;
    }
    if cli.secret.is_some() {
        server_config.secret = cli.secret;
    }

    let state = Arc::new(AppState {
        team,
        secret: server_config.secret.clone(),
    });
    start_server(&server_config.bind_address(), state).await
}

async fn run_analyze_mode(team: &MedicalTeam, path: &str) -> anyhow::Result<()> {
    let text = if path == "-" {
        use tokio::io::AsyncReadExt;
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("lendo {}", path))?
    };

    let analysis = team.analyze_text(&text).await?;
    print_analysis(&analysis);
    Ok(())
}

fn print_analysis(analysis: &TeamAnalysis) {
    for opinion in [
        &analysis.cardiologist,
        &analysis.psychologist,
        &analysis.pulmonologist,
        &analysis.summary,
    ] {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(" {}", opinion.role.display_name().to_uppercase());
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("{}", opinion.text().trim());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_empty() {
        assert_eq!(parse_args(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_parse_args_server_flags() {
        let cli = parse_args(&args(&["--host=0.0.0.0", "--port=8080", "--secret=abc", "--parallel"]))
            .unwrap();
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.secret.as_deref(), Some("abc"));
        assert!(cli.parallel);
        assert!(cli.analyze.is_none());
    }

    #[test]
    fn test_parse_args_analyze() {
        let cli = parse_args(&args(&["--analyze", "report.txt"])).unwrap();
        assert_eq!(cli.analyze.as_deref(), Some("report.txt"));
        assert!(parse_args(&args(&["--analyze"])).is_err());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["--port=0"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }
}
