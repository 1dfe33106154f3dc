use clap::Parser;
use polymap::graph::builder::jittered_voronoi;
use polymap::{GenerationParams, TerrainSnapshot, generate_terrain, save_preview};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Генератор фэнтезийной местности на графе ячеек
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: PathBuf,

    /// Путь для сохранения превью (по умолчанию: ./terrain.png)
    #[arg(short, long, default_value = "terrain.png")]
    output: PathBuf,

    /// Путь для JSON-снимка местности
    #[arg(short, long)]
    json: Option<PathBuf>,

    /// Переопределить seed из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let mut params = GenerationParams::from_toml_file(&cli.config)?;
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

    println!(
        "Построение разбиения ({} ячеек, растр {}×{})...",
        params.cell_count, params.width, params.height
    );
    let mut graph = jittered_voronoi(params.width, params.height, params.cell_count, &mut rng)?;

    println!("Генерация местности (seed {})...", params.seed);
    let report = generate_terrain(&mut graph, &params, &mut rng)?;
    println!(
        "  океан: {}, озёра: {}, суша: {}",
        report.water.ocean_cells, report.water.lake_cells, report.water.land_cells
    );
    println!(
        "  реки: {} истоков, {} ячеек русел; поселений: {}",
        report.rivers.sources, report.rivers.river_cells, report.settlements
    );

    println!("Сохранение превью в {:?}", cli.output);
    save_preview(&graph, &cli.output)?;

    if let Some(path) = &cli.json {
        println!("Сохранение снимка в {path:?}");
        TerrainSnapshot::from_graph(&graph).save_json(path)?;
    }

    println!("\nГотово!");
    Ok(())
}
