//! Count the exact number of items behind a paginated GraphQL API.
//!
//! Usage: catalog-count <endpoint> [per_page]

use kiroku_server::{
    catalog::{GraphqlPageOracle, count_catalog},
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() {
    let subscriber = get_subscriber("catalog-count".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber);

    let mut args = std::env::args().skip(1);
    let endpoint = args.next().expect("Usage: catalog-count <endpoint> [per_page]");
    let per_page: u32 = args
        .next()
        .map(|raw| raw.parse().expect("per_page must be a positive integer"))
        .unwrap_or(50);

    let oracle = GraphqlPageOracle::new(reqwest::Client::new(), endpoint, per_page);

    let outcome = count_catalog(&oracle, per_page)
        .await
        .expect("Failed counting catalog.");

    println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
}
