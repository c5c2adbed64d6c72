use shared::{
    Result,
    info,
};

use qmflows_namd::cli::run;

fn main() -> Result<()> {
    let now = std::time::Instant::now();

    run()?;

    info!("Time used: {:?}", now.elapsed());
    Ok(())
}
