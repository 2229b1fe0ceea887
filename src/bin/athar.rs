// ─────────────────────────────────────────────────────────────────────────────
//  Athar — Token Flow Tracer
//  Part of the Al-Hafiz Project, the Guardian Layer of BismillahDAO.
//
//  Athar (أثر): "The Trace" — follows the footprints a token leaves behind,
//  hop by hop, so the path of funds around a wallet can be seen plainly.
//
//  Designed to reveal where value came from and where it went.
//
//  In the name of Allah, the Most Gracious, the Most Merciful.
// ─────────────────────────────────────────────────────────────────────────────

use athar::engine::athar::Athar;
use athar::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    Athar::run().await?;
    Ok(())
}
