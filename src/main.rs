use chirpy::{Body, CallArgs, Client, Config, Error, Media, Response};
use log::{info, warn};
use reqwest::Method;
use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};
use structopt::StructOpt;

#[derive(StructOpt)]
struct Options {
    #[structopt(short, long, parse(from_os_str), default_value = "chirpy.toml")]
    /// config file to use
    config: PathBuf,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    #[structopt(name = "call")]
    /// Invoke an API call chain, eg. `statuses/home_timeline`
    Call(CallOptions),

    #[structopt(name = "rate-limit")]
    /// Show the rate limits of the configured credentials
    RateLimit {
        /// Resource families to report on, eg. `statuses`
        resources: Vec<String>,
    },

    #[structopt(name = "tweet")]
    /// Post a status
    Tweet {
        status: String,

        #[structopt(long, parse(from_os_str))]
        /// image to attach
        media: Option<PathBuf>,
    },
}

#[derive(StructOpt)]
struct CallOptions {
    /// Segments of the call separated by '/', so a segment may contain dots
    path: String,

    #[structopt(short, long = "param", parse(try_from_str = parse_param))]
    /// Parameter as `name=value`, may be repeated
    params: Vec<(String, String)>,

    #[structopt(long)]
    /// http method to use instead of the derived one
    method: Option<Method>,

    #[structopt(long)]
    /// json request body
    json: Option<String>,

    #[structopt(long)]
    /// id appended to the path
    id: Option<String>,

    #[structopt(long)]
    /// timeout in seconds
    timeout: Option<u64>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let idx = s
        .find('=')
        .ok_or_else(|| format!("expected `name=value`, got '{}'", s))?;
    Ok((s[..idx].to_owned(), s[idx + 1..].to_owned()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let opts = Options::from_args();

    // set up logging, allowing info level logging by default
    env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = if opts.config.exists() {
        Config::from_file(&opts.config)?
    } else {
        warn!(
            "config file {} not found; sending unauthenticated requests",
            opts.config.display()
        );
        Config::default()
    };
    let client = config.client_builder()?.build()?;

    match opts.command {
        Command::Call(options) => {
            let response = call(&client, options).await?;
            print_response(&response)
        }
        Command::RateLimit { resources } => {
            let resources: Vec<&str> = resources.iter().map(String::as_str).collect();
            let status = client.rate_limit().get(&resources).await?;

            let mut endpoints: Vec<_> = status
                .resources
                .values()
                .flat_map(|endpoints| endpoints.iter())
                .collect();
            endpoints.sort_by(|a, b| a.0.cmp(b.0));

            for (endpoint, rate) in endpoints {
                println!("{} {}/{}", endpoint, rate.remaining, rate.limit);
            }
            Ok(())
        }
        Command::Tweet { status, media } => {
            let response = match media {
                Some(path) => {
                    client
                        .media()
                        .update_with_media(&status, Media::from_file(path)?, CallArgs::new())
                        .await?
                }
                None => {
                    client
                        .attr("statuses")
                        .attr("update")
                        .invoke(CallArgs::new().param("status", status))
                        .await?
                }
            };
            print_response(&response)
        }
    }
}

async fn call(client: &Client, options: CallOptions) -> Result<Response, Error> {
    let mut args: CallArgs = options.params.into_iter().collect();

    if let Some(method) = options.method {
        args = args.method(method);
    }
    if let Some(json) = options.json {
        args = args.json(serde_json::from_str(&json)?);
    }
    if let Some(id) = options.id {
        args = args.id(id);
    }
    if let Some(timeout) = options.timeout {
        args = args.timeout(Duration::from_secs(timeout));
    }

    info!("calling {}", options.path);
    options
        .path
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(client.root(), |call, part| call.attr(part))
        .invoke(args)
        .await
}

fn print_response(response: &Response) -> Result<(), Error> {
    let rate = response.rate();
    match rate.reset_at() {
        Some(reset_at) => info!(
            "rate limit: {}/{} remaining, resets at {}",
            rate.remaining, rate.limit, reset_at
        ),
        None => info!("rate limit: {}/{} remaining", rate.remaining, rate.limit),
    }

    match response.body() {
        Body::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Body::Text(text) => println!("{}", text),
        Body::Image { bytes, .. } | Body::Bytes(bytes) => io::stdout().write_all(bytes)?,
    }

    Ok(())
}
