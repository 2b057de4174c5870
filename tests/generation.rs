use hexmap::climate::simulate_climate;
use hexmap::rivers::origin_weight;
use hexmap::{EditCommand, HexDirection, HexGrid, MapError, MapGenConfig, generate_map};

fn scenario_config(seed: u32) -> MapGenConfig {
    let mut config = MapGenConfig {
        seed,
        cell_count_x: 32,
        cell_count_z: 24,
        ..MapGenConfig::default()
    };
    config.land.land_percentage = 50;
    config.land.water_level = 3;
    config
}

fn assert_rivers_valid(grid: &HexGrid) {
    for cell in grid.cells() {
        if let Some(d) = cell.outgoing_river() {
            let n = grid
                .neighbor(cell.index(), d)
                .unwrap_or_else(|| panic!("river of cell {} leaves the map", cell.index()));
            let target = grid.cell(n);
            assert_eq!(target.incoming_river(), Some(d.opposite()), "cell {}", cell.index());
            assert!(
                cell.is_valid_river_destination(target),
                "river {} -> {n} flows uphill",
                cell.index()
            );
        }
        if let Some(d) = cell.incoming_river() {
            let n = grid.neighbor(cell.index(), d).expect("river enters from outside the map");
            assert_eq!(grid.cell(n).outgoing_river(), Some(d.opposite()));
        }
    }
}

fn assert_roads_legal(grid: &HexGrid) {
    for cell in grid.cells() {
        if cell.is_special() {
            assert!(!cell.has_roads(), "special cell {} has roads", cell.index());
        }
        for d in HexDirection::ALL {
            if !cell.has_road_through_edge(d) {
                continue;
            }
            let n = grid.neighbor(cell.index(), d).expect("road leaves the map");
            let other = grid.cell(n);
            assert!(other.has_road_through_edge(d.opposite()));
            assert!((cell.elevation() - other.elevation()).abs() <= 1);
            assert!(!cell.has_river_through_edge(d));
        }
    }
}

#[test]
fn elevations_stay_within_bounds() {
    for seed in 0..6 {
        let config = scenario_config(seed);
        let (grid, _) = generate_map(&config).unwrap();
        for cell in grid.cells() {
            assert!(
                (config.land.elevation_minimum..=config.land.elevation_maximum)
                    .contains(&cell.elevation()),
                "seed {seed}: cell {} at elevation {}",
                cell.index(),
                cell.elevation()
            );
        }
    }
}

#[test]
fn generated_rivers_are_valid() {
    for seed in 0..6 {
        let (grid, report) = generate_map(&scenario_config(seed)).unwrap();
        assert_rivers_valid(&grid);
        let sources = grid
            .cells()
            .iter()
            .filter(|c| c.has_outgoing_river() && !c.has_incoming_river())
            .count();
        assert!(sources <= report.rivers, "seed {seed}");
    }
}

#[test]
fn generation_is_deterministic() {
    let config = scenario_config(1234);
    let first = generate_map(&config).unwrap();
    let second = generate_map(&config).unwrap();
    assert_eq!(first, second);

    let other = generate_map(&scenario_config(1235)).unwrap();
    assert_ne!(first.0, other.0, "different seeds should give different maps");
}

#[test]
fn land_fraction_is_close_to_target() {
    for seed in 0..4 {
        let mut config = scenario_config(seed);
        config.land.erosion_percentage = 0;
        config.rivers.extra_lake_probability = 0.0;
        let (grid, report) = generate_map(&config).unwrap();

        assert_eq!(report.land_budget_left, 0, "seed {seed}");
        assert_eq!(report.land_cells, 384);
        let land = grid
            .cells()
            .iter()
            .filter(|c| c.elevation() >= config.land.water_level)
            .count();
        assert!(
            land.abs_diff(384) <= config.land.chunk_size_max,
            "seed {seed}: {land} land cells"
        );
    }
}

/// Если есть подходящий исток, хотя бы одна река будет проложена
#[test]
fn rivers_appear_when_origins_exist() {
    for seed in 0..4 {
        let mut dry = scenario_config(seed);
        dry.rivers.river_percentage = 0;
        let (before, dry_report) = generate_map(&dry).unwrap();
        assert_eq!(dry_report.rivers, 0);

        let climate = simulate_climate(&before, &dry.climate, dry.land.elevation_maximum);
        let has_origin = before.cells().iter().any(|cell| {
            !cell.is_underwater()
                && origin_weight(climate[cell.index()].moisture, cell.elevation(), &dry.land) > 0.25
                && cell
                    .neighbors()
                    .all(|(_, n)| !before.cell(n).is_underwater())
                && cell
                    .neighbors()
                    .any(|(_, n)| before.cell(n).elevation() <= cell.elevation())
        });

        let (_, report) = generate_map(&scenario_config(seed)).unwrap();
        if has_origin {
            assert!(report.rivers > 0, "seed {seed}: origin available but no rivers");
        }
    }
}

#[test]
fn edits_keep_roads_and_rivers_legal() {
    let (mut grid, _) = generate_map(&scenario_config(77)).unwrap();
    for index in (0..grid.len()).step_by(5) {
        for d in HexDirection::ALL {
            grid.apply_edit(index, EditCommand::AddRoad(d)).unwrap();
        }
    }
    assert_roads_legal(&grid);

    let center = grid.cell_at_offset(16, 12).unwrap();
    grid.apply_brush(center, 2, EditCommand::SetElevation(8)).unwrap();
    grid.apply_brush(center, 1, EditCommand::SetElevation(-2)).unwrap();
    grid.apply_brush(center, 3, EditCommand::SetSpecialIndex(1)).unwrap();
    for index in (0..grid.len()).step_by(3) {
        grid.apply_edit(index, EditCommand::SetOutgoingRiver(HexDirection::SE))
            .unwrap();
    }

    assert_roads_legal(&grid);
    assert_rivers_valid(&grid);
}

#[test]
fn wrapping_maps_generate() {
    let mut config = scenario_config(5);
    config.wrapping = true;
    config.land.region_count = 2;
    let (grid, report) = generate_map(&config).unwrap();
    assert!(grid.wrapping());
    assert_rivers_valid(&grid);
    assert!(report.land_cells > 0);

    // крайние столбцы — соседи
    let west = grid.cell_at_offset(0, 5).unwrap();
    let east = grid.cell_at_offset(31, 5).unwrap();
    assert_eq!(grid.neighbor(west, HexDirection::W), Some(east));
    assert_eq!(grid.distance(west, east), 1);
}

#[test]
fn every_region_layout_generates() {
    for region_count in 1..=4 {
        let mut config = scenario_config(9);
        config.cell_count_x = 48;
        config.cell_count_z = 32;
        config.land.region_count = region_count;
        config.land.region_border = 2;
        let (grid, _) = generate_map(&config).unwrap();
        assert!(
            grid.cells().iter().any(|c| !c.is_underwater()),
            "{region_count} regions"
        );
    }
}

#[test]
fn unsupported_sizes_are_refused() {
    for (x, z) in [(30, 24), (32, 0), (33, 25)] {
        let config = MapGenConfig {
            cell_count_x: x,
            cell_count_z: z,
            ..scenario_config(1)
        };
        assert_eq!(
            generate_map(&config),
            Err(MapError::UnsupportedMapSize { x, z })
        );
    }
}

#[test]
fn regions_that_do_not_fit_are_refused() {
    let mut config = scenario_config(1);
    config.cell_count_x = 8;
    config.cell_count_z = 8;
    config.land.region_count = 4;
    assert!(matches!(generate_map(&config), Err(MapError::InvalidConfig(_))));
}
