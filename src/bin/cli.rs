use clap::Parser;
use hexmap::{MapGenConfig, MapGenerator, MovementRules, find_path, save_preview};
use std::path::PathBuf;

/// Генератор гексагональных карт
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию — встроенные параметры)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Сид генератора (заменяет значение из конфигурации)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Путь для сохранения превью (по умолчанию: ./preview.png)
    #[arg(short, long, default_value = "preview.png")]
    output: PathBuf,

    /// Масштаб превью: пикселей на единицу мира
    #[arg(long, default_value_t = 2.0)]
    scale: f32,

    /// Найти путь между ячейками: `x0,z0:x1,z1` в смещённых координатах
    #[arg(long, value_parser = parse_route)]
    path: Option<Route>,

    /// Скорость отряда (очков движения за ход)
    #[arg(long, default_value_t = hexmap::pathfinding::DEFAULT_SPEED)]
    speed: i32,

    /// Вывести сводку генерации в JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy)]
struct Route {
    from: (i32, i32),
    to: (i32, i32),
}

fn parse_cell(value: &str) -> Result<(i32, i32), String> {
    let (x, z) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{value}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{value}`: {e}"))?;
    let z = z.trim().parse().map_err(|e| format!("bad z in `{value}`: {e}"))?;
    Ok((x, z))
}

fn parse_route(value: &str) -> Result<Route, String> {
    let (from, to) = value
        .split_once(':')
        .ok_or_else(|| format!("expected `x0,z0:x1,z1`, got `{value}`"))?;
    Ok(Route {
        from: parse_cell(from)?,
        to: parse_cell(to)?,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let mut config = match &cli.config {
        Some(path) => MapGenConfig::from_toml_file(&path.to_string_lossy())?,
        None => MapGenConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    println!(
        "Генерация карты (размер: {}×{}, сид {})...",
        config.cell_count_x, config.cell_count_z, config.seed
    );
    let (mut grid, report) = MapGenerator::new().generate(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Суша: {} ячеек, рек: {} ({} ячеек), озёр: {}",
            report.land_cells, report.rivers, report.river_cells, report.lakes
        );
    }

    if let Some(route) = cli.path {
        // видимость — забота внешнего слоя; для запроса из консоли карта открыта целиком
        grid.explore_all();
        let rules = MovementRules::new(cli.speed)?;
        let from = grid
            .cell_at_offset(route.from.0, route.from.1)
            .ok_or_else(|| format!("cell {:?} is outside the map", route.from))?;
        let to = grid
            .cell_at_offset(route.to.0, route.to.1)
            .ok_or_else(|| format!("cell {:?} is outside the map", route.to))?;

        match find_path(&grid, from, to, &rules)? {
            Some(path) => {
                let cells: Vec<String> = path
                    .cells
                    .iter()
                    .map(|&i| grid.cell(i).coordinates().to_string())
                    .collect();
                println!(
                    "Путь: стоимость {}, ход {}, {} ячеек",
                    path.cost,
                    path.turns,
                    path.cells.len()
                );
                println!("  {}", cells.join(" → "));
            }
            None => println!("Путь не найден"),
        }
    }

    println!("Сохранение в {:?}", cli.output);
    save_preview(&grid, cli.scale, &cli.output.to_string_lossy())?;

    println!("\nГотово! Превью карты сохранено.");
    Ok(())
}
