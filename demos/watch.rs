//! Follow a device's live feed in the terminal.
//!
//! ```bash
//! THERMOLOG_HOST=192.168.1.42 RUST_LOG=info cargo run --example watch --features native
//! ```

use thermolog_sdk::client::ThermologClientBuilder;
use thermolog_sdk::domain::series::{ChartRenderer, Notice, Sample, Series};
use tracing_subscriber::EnvFilter;

/// Prints the chart as text: a summary on redraw, one line per new point.
struct TerminalChart;

impl ChartRenderer for TerminalChart {
    fn redraw(&mut self, series: &Series) {
        match (series.min(), series.max(), series.last()) {
            (Some(min), Some(max), Some(last)) => println!(
                "{} samples  min {:.1}  max {:.1}  latest {} {:.1}",
                series.len(),
                min.value,
                max.value,
                last.label,
                last.value
            ),
            _ => println!("no samples stored"),
        }
    }

    fn push_point(&mut self, sample: &Sample) {
        println!("{:<22} {:>6.1}", sample.label, sample.value);
    }

    fn notice(&mut self, notice: Notice) {
        match notice {
            Notice::Info(text) => println!("device: {}", text),
            Notice::Error(text) => eprintln!("error: {}", text),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = ThermologClientBuilder::from_env().build()?;
    println!("watching {}", client.endpoints().feed_url());

    let mut feed = client.feed_native();
    let mut dashboard = client.dashboard(TerminalChart);
    feed.connect().await?;

    tokio::select! {
        () = dashboard.run(&feed) => {}
        _ = tokio::signal::ctrl_c() => println!(),
    }

    feed.disconnect().await?;
    Ok(())
}
