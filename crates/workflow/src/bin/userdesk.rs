//! Thin command-line front end for ad-hoc use against a running portal.
//!
//! `userdesk lookup <postal-code> [country]` — resolve locality data.
//! `userdesk profile` — print the authenticated user's person record and
//! addresses (`USERDESK_TOKEN` must be set).

use anyhow::{Context, bail};

use userdesk_workflow::http::{HttpAddressService, HttpPersonService};
use userdesk_workflow::{AddressService, PersonService, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    userdesk_observability::init();

    let config = ServiceConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("lookup") => {
            let code = args
                .get(1)
                .context("usage: userdesk lookup <postal-code> [country]")?;
            let country = args.get(2).map(String::as_str);

            let chain = config.lookup_chain();
            match chain.lookup(code, country.or(Some("India"))).await {
                Ok(outcome) => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Err(e) => bail!("no locality found for {code}: {e}"),
            }
        }
        Some("profile") => {
            let token =
                std::env::var("USERDESK_TOKEN").context("USERDESK_TOKEN must be set")?;

            let persons = HttpPersonService::new(&config);
            let person = persons.fetch_self(&token).await?;
            println!("{}", serde_json::to_string_pretty(&person)?);

            if let Some(id) = person.id {
                let addresses = HttpAddressService::new(&config);
                let owned = addresses.list_for(&token, id).await?;
                println!("{}", serde_json::to_string_pretty(&owned)?);
            }
        }
        _ => bail!("usage: userdesk <lookup|profile> ..."),
    }

    Ok(())
}
