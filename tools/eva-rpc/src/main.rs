//! eva-rpc: publish a fire-and-forget RPC message to EVA instances.
//!
//! The message is addressed by a regex over instance ids, evaluated by the
//! receivers. Success means only that a broker acknowledged the message
//! within 5000 ms; there is no reply channel. Exit codes: 0 on broker ack,
//! 1 on timeout or any broker error.

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use eva_bus::{BusPublisher, RpcEnvelope, DEFAULT_TOPIC};

/// Publish an RPC message to EVA instances over Kafka.
#[derive(Parser, Debug)]
#[command(name = "eva-rpc")]
#[command(about = "Publish a fire-and-forget RPC message to EVA instances")]
struct Cli {
    /// Kafka broker address (repeat for multiple brokers)
    #[arg(long = "broker", required = true)]
    broker: Vec<String>,

    /// Regex matched against instance ids by the receiving instances
    #[arg(long, alias = "instance_id", default_value = ".*")]
    instance_id: String,

    /// Name of the remote function to invoke
    #[arg(long)]
    function: String,

    /// Positional argument (repeat to pass several, in order)
    #[arg(long = "arg")]
    args: Vec<String>,

    /// key=value keyword argument (repeatable)
    #[arg(long = "kwarg", value_parser = parse_kwarg)]
    kwargs: Vec<(String, String)>,

    /// Kafka topic carrying EVA RPC messages
    #[arg(long, default_value = DEFAULT_TOPIC)]
    topic: String,
}

fn parse_kwarg(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

async fn run(cli: Cli) -> i32 {
    let envelope = RpcEnvelope::new(cli.instance_id, cli.function, cli.args, cli.kwargs);

    let publisher = match BusPublisher::new(&cli.broker, cli.topic) {
        Ok(publisher) => publisher,
        Err(err) => {
            error!("{err}");
            return err.exit_code();
        }
    };

    match publisher.publish(&envelope).await {
        Ok(_receipt) => 0,
        Err(err) => {
            error!("{err}");
            err.exit_code()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let code = run(cli).await;
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(argv)
    }

    #[test]
    fn broker_is_required() {
        assert!(parse(&["eva-rpc", "--function", "foo"]).is_err());
    }

    #[test]
    fn defaults_apply() {
        let cli = parse(&["eva-rpc", "--broker", "b1:9092", "--function", "foo"]).unwrap();
        assert_eq!(cli.instance_id, ".*");
        assert_eq!(cli.topic, DEFAULT_TOPIC);
        assert!(cli.args.is_empty());
        assert!(cli.kwargs.is_empty());
    }

    #[test]
    fn repeated_brokers_and_args_keep_order() {
        let cli = parse(&[
            "eva-rpc",
            "--broker",
            "b1:9092",
            "--broker",
            "b2:9092",
            "--function",
            "foo",
            "--arg",
            "x",
            "--arg",
            "y",
        ])
        .unwrap();
        assert_eq!(cli.broker, vec!["b1:9092", "b2:9092"]);
        assert_eq!(cli.args, vec!["x", "y"]);
    }

    #[test]
    fn kwarg_parses_key_value() {
        let cli = parse(&[
            "eva-rpc",
            "--broker",
            "b1:9092",
            "--function",
            "foo",
            "--kwarg",
            "k=v",
            "--kwarg",
            "url=http://x/?a=b",
        ])
        .unwrap();
        assert_eq!(
            cli.kwargs,
            vec![
                ("k".to_string(), "v".to_string()),
                // split on the first '=' only
                ("url".to_string(), "http://x/?a=b".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_kwarg_is_rejected() {
        assert!(parse(&[
            "eva-rpc",
            "--broker",
            "b1:9092",
            "--function",
            "foo",
            "--kwarg",
            "novalue",
        ])
        .is_err());
    }

    #[test]
    fn cli_builds_the_documented_envelope() {
        let cli = parse(&[
            "eva-rpc",
            "--broker",
            "b1",
            "--topic",
            "eva.rpc",
            "--function",
            "foo",
            "--arg",
            "x",
            "--kwarg",
            "k=v",
        ])
        .unwrap();
        let envelope = RpcEnvelope::new(cli.instance_id, cli.function, cli.args, cli.kwargs);
        assert_eq!(
            String::from_utf8(envelope.to_bytes().unwrap()).unwrap(),
            r#"{"type":"rpc","instance_id":".*","function":"foo","args":["x"],"kwargs":{"k":"v"}}"#
        );
    }
}
