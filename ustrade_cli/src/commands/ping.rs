use anyhow::{bail, Result};
use ustrade_lib::TradeClient;

pub async fn run(client: &TradeClient) -> Result<()> {
    let base_url = client.api().base_url();
    if client.is_reachable().await? {
        println!("{} is reachable", base_url);
        Ok(())
    } else {
        bail!("{} is not reachable", base_url)
    }
}
