use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "yt-transcribe",
    about = "YouTube transcript anonymization service",
    long_about = "Fetches YouTube transcripts, anonymizes them with an LLM, renders them as HTML and stores the result. Runs the HTTP API or talks to a running one.",
    after_help = "EXAMPLES:\n    # Start the API server (needs OPENAI_KEY)\n    yt-transcribe serve\n\n    # Transcribe a video through a running server\n    yt-transcribe transcribe dQw4w9WgXcQ\n\n    # List stored transcriptions\n    yt-transcribe list\n\n    # Delete a stored transcription\n    yt-transcribe delete dQw4w9WgXcQ --server-url http://my-server:8080"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "serve")]
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
    #[command(name = "transcribe")]
    Transcribe {
        #[arg(value_parser = validate_video_id)]
        video_id: String,

        #[arg(long, default_value = "http://localhost:8080")]
        server_url: String,
    },
    #[command(name = "list")]
    List {
        #[arg(long, default_value = "http://localhost:8080")]
        server_url: String,
    },
    #[command(name = "delete")]
    Delete {
        video_id: String,

        #[arg(long, default_value = "http://localhost:8080")]
        server_url: String,
    },
}

pub fn validate_video_id(s: &str) -> Result<String, String> {
    crate::youtube::validate_video_id(s)
        .map(|()| s.to_string())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_defaults() {
        let cli = Cli::try_parse_from(["yt-transcribe", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8080);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn transcribe_rejects_malformed_id() {
        assert!(Cli::try_parse_from(["yt-transcribe", "transcribe", "bad id"]).is_err());
        assert!(Cli::try_parse_from(["yt-transcribe", "transcribe", "dQw4w9WgXcQ"]).is_ok());
    }

    #[test]
    fn delete_accepts_server_url() {
        let cli = Cli::try_parse_from([
            "yt-transcribe",
            "delete",
            "dQw4w9WgXcQ",
            "--server-url",
            "http://example:9000",
        ])
        .unwrap();
        match cli.command {
            Commands::Delete {
                video_id,
                server_url,
            } => {
                assert_eq!(video_id, "dQw4w9WgXcQ");
                assert_eq!(server_url, "http://example:9000");
            }
            _ => panic!("expected delete"),
        }
    }
}
