use dotenv::dotenv;
use env_logger::{Env, Target};
use log::info;
use quotedata::QuoteClient;
use std::time::Duration;
use stockdb::{Error, Iterations, PollConfig, Poller, Result, Store, Symbol};
use structopt::StructOpt;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let opt = Opt::from_args();
    match opt.cmd {
        Command::Init => {
            let store = Store::open(&opt.dbfile)?;
            store.bootstrap()?;
            info!("tables ready in {}", opt.dbfile);
        }
        Command::Run {
            symbols,
            periods,
            forever,
            delay,
        } => {
            let symbols = match symbols {
                Some(list) => PollConfig::parse_symbols(&list)?,
                None => PollConfig::default_symbols()?,
            };
            let iterations = if forever {
                Iterations::Unbounded
            } else {
                Iterations::Bounded(periods)
            };
            let config = PollConfig::new(symbols, iterations, delay_from_secs(delay)?)?;
            let client = QuoteClient::with_urls(&opt.quote_url, &opt.company_url)
                .map_err(|e| Error::Config(format!("cannot build http client: {}", e)))?;
            let store = Store::open(&opt.dbfile)?;
            let mut poller = Poller::new(&store, &client, &client, config);
            poller.run()?;
        }
        Command::Show { symbol } => {
            let symbol: Symbol = symbol.parse()?;
            let store = Store::open(&opt.dbfile)?;
            let prices = store.select_prices(&symbol.to_string())?;
            for p in &prices {
                println!(
                    "{:25}{:>14}  {}",
                    p.observed_at_text(),
                    p.price.to_string(),
                    p.venue
                );
            }
        }
    }
    Ok(())
}

fn delay_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::Config(format!("invalid delay {}: {}", secs, e)))
}

#[derive(Debug, StructOpt)]
#[structopt(name = "stockdb", about = "poll stock quotes into a sqlite database")]
struct Opt {
    #[structopt(
        short,
        long,
        env = "STOCKDB_FILE",
        help = "specify dbfile to use",
        default_value = "./stocks.db"
    )]
    dbfile: String,

    #[structopt(
        long,
        env = "STOCKDB_QUOTE_URL",
        help = "base url of the quote feed",
        default_value = "http://finance.google.com"
    )]
    quote_url: String,

    #[structopt(
        long,
        env = "STOCKDB_COMPANY_URL",
        help = "base url of the company pages",
        default_value = "https://www.google.com"
    )]
    company_url: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Create the tables if absent
    Init,
    /// Record company metadata, then poll quotes
    Run {
        #[structopt(
            short,
            long,
            env = "STOCKDB_SYMBOLS",
            help = "comma separated symbols, e.g. NASDAQ:AAPL,NYSE:GE"
        )]
        symbols: Option<String>,
        #[structopt(
            short = "n",
            long,
            env = "STOCKDB_PERIODS",
            help = "number of polling iterations",
            default_value = "1"
        )]
        periods: u64,
        #[structopt(long, help = "poll until killed, ignoring --periods")]
        forever: bool,
        #[structopt(
            long,
            env = "STOCKDB_DELAY",
            help = "seconds to sleep between iterations",
            default_value = "3600"
        )]
        delay: f64,
    },
    /// Print stored prices of one symbol
    Show { symbol: String },
}
