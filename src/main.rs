use branch_beacon::geo::{self, Coordinates};
use branch_beacon::graph::client::{DEFAULT_ENDPOINT, DEFAULT_LIMIT};
use branch_beacon::graph::GraphClient;
use branch_beacon::server;
use clap::Parser;

/// Branch Beacon — branch directory lookups over a content graph.
///
/// One-shot lookups print JSON to stdout; --serve starts the web UI and
/// JSON API with the graph credential held server-side.
///
/// Examples:
///   beacon --list
///   beacon --search tampa
///   beacon --search tampa --near "27.95,-82.45"
///   beacon --country "United States"
///   beacon --countries
///   beacon --nearest --near "40.7128,-74.0060" --limit 10
///   beacon --serve --port 8787
#[derive(Parser)]
#[command(name = "beacon", version, about, long_about = None)]
struct Cli {
    /// List branches.
    #[arg(long)]
    list: bool,

    /// Search branches by case-insensitive substring.
    #[arg(long)]
    search: Option<String>,

    /// List branches in a country (exact name, case-insensitive).
    #[arg(long)]
    country: Option<String>,

    /// List the countries derived from branch records.
    #[arg(long)]
    countries: bool,

    /// Show the branches closest to --near, ranked by distance.
    #[arg(long)]
    nearest: bool,

    /// Origin as "LAT,LON". Adds distance ranking to list/search/country
    /// output; required for --nearest.
    #[arg(long, allow_hyphen_values = true)]
    near: Option<String>,

    /// Max records to fetch (upstream ceiling 100).
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,

    /// Accepted for compatibility; the upstream has no offset paging.
    #[arg(long)]
    skip: Option<u32>,

    /// Start the HTTP server instead of a one-shot lookup.
    #[arg(long)]
    serve: bool,

    /// Server bind host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server bind port.
    #[arg(long, default_value_t = 8787)]
    port: u16,

    /// Upstream graph endpoint.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Graph credential. Falls back to the BEACON_GRAPH_AUTH env var.
    #[arg(long)]
    auth: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // ── Build the client ────────────────────────────────────────

    let auth = cli
        .auth
        .clone()
        .or_else(|| std::env::var("BEACON_GRAPH_AUTH").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: No graph credential. Pass --auth or set BEACON_GRAPH_AUTH.");
            std::process::exit(1);
        });
    let client = GraphClient::new(cli.endpoint.clone(), auth);

    // ── Serve ───────────────────────────────────────────────────

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start async runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(server::start(&cli.host, cli.port, client));
        return;
    }

    // ── Parse origin, if any ────────────────────────────────────

    let origin = match &cli.near {
        Some(raw) => match geo::parse_coordinates(Some(raw)) {
            Some(c) => Some(c),
            None => {
                eprintln!(
                    "Error: Invalid --near '{}'. Expected \"LAT,LON\" with lat -90..90 and lon -180..180.",
                    raw
                );
                std::process::exit(1);
            }
        },
        None => None,
    };

    // ── One-shot lookups ────────────────────────────────────────

    if cli.countries {
        let countries = client.fetch_countries().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
        eprintln!("  {} countries", countries.len());
        print_json(&countries);
        return;
    }

    if cli.nearest {
        let Some(origin) = origin else {
            eprintln!("Error: --nearest requires --near \"LAT,LON\".");
            std::process::exit(1);
        };
        let ranked = client
            .nearest_branches(origin, cli.limit as usize, 100)
            .unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
        eprintln!("  {} branches near {:.4},{:.4}", ranked.len(), origin.lat, origin.lon);
        print_json(&ranked);
        return;
    }

    let branches = if let Some(ref term) = cli.search {
        client.search_branches(term, cli.limit)
    } else if let Some(ref country) = cli.country {
        client.fetch_branches_by_country(country, cli.limit)
    } else if cli.list {
        client.fetch_branches(cli.limit, cli.skip)
    } else {
        eprintln!("Error: Nothing to do.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  beacon --list");
        eprintln!("  beacon --search tampa --near \"27.95,-82.45\"");
        eprintln!("  beacon --country \"United States\"");
        eprintln!("  beacon --countries");
        eprintln!("  beacon --nearest --near \"40.7128,-74.0060\"");
        eprintln!("  beacon --serve");
        std::process::exit(1);
    };

    let branches = branches.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let ranked = rank_for_output(origin, branches);
    print_json(&ranked);
}

/// Ranking applies whenever an origin was given; otherwise the list
/// passes through in upstream order with no distances attached.
fn rank_for_output(
    origin: Option<Coordinates>,
    branches: Vec<branch_beacon::graph::Branch>,
) -> Vec<branch_beacon::graph::RankedBranch> {
    let ranked = geo::rank_by_distance(origin, branches);
    eprintln!("  {} branches", ranked.len());
    ranked
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap());
}
