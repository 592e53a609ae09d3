use rhci::*;
use std::sync::Arc;
use std::time;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };

    let now = time::Instant::now();
    let grid = Arc::new(config.grid.build()?);
    println!("\nSampling apertures");
    println!("npoints: {:10}", grid.size());
    println!("{:10.2e} sec for building grid", 1e-6*(now.elapsed().as_micros() as f64));

    for named in &config.apertures {
        let aperture = named.spec.build()?;

        let now = time::Instant::now();
        let transmission = aperture.sample(&grid);
        println!("{:10.2e} sec for sampling {}", 1e-6*(now.elapsed().as_micros() as f64), named.name);

        let mut camera = NoiselessDetector::new(Arc::clone(&grid));
        let wavefront = Wavefront::plane(Arc::clone(&grid), config.wavelength)?;
        let apodizer = Apodizer::from_transmission(&transmission);
        camera.integrate(&apodizer.propagate(&wavefront)?, 1.0)?;
        println!("{:>10} transmitted power: {:.4}", named.name, camera.read_out().sum() / wavefront.total_power());

        let now = time::Instant::now();
        write_field(&transmission, config.output_dir.join(format!("{}.fits", named.name)), None)?;
        println!("{:10.2e} sec for saving fits", 1e-6*(now.elapsed().as_micros() as f64));
    }
    Ok(())
}
