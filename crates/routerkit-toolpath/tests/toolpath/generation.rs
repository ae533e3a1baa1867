use routerkit_core::{
    Config, DataLibrary, GangSlot, LookupError, OperationLibrary, OperationRecord, OutputConfig,
    Router, RouterLibrary, Tool, ToolLibrary, ToolpathError,
};
use routerkit_toolpath::{
    BulgePoint, ChainGeometry, Emitter, Feature, Nest, OperationKind, Part, PartGeometry, Point2,
    Rect2, Sheet, ToolpathGenerator, ToolpathSegmentType,
};

fn data() -> DataLibrary {
    let mut tools = ToolLibrary::new();
    tools.add_tool(Tool::new("T1", "1/2 Compression", 0.5));
    tools.add_tool(Tool::new("D5", "5mm Drill", 0.197));

    let mut operations = OperationLibrary::new();
    operations.add_operation(
        OperationRecord::new("Tray", "pocket", "T1")
            .with_rates(400, 100, 16000)
            .with_heights(0.25, 0.0, 0.5),
    );
    operations.add_operation(
        OperationRecord::new("BLOCKDRILLSYSTEM", "", "D5")
            .with_rates(300, 150, 6000)
            .with_heights(0.5, 0.0, 0.5),
    );

    let mut routers = RouterLibrary::new();
    routers.add_router(
        Router::new("R1", "Multicam 3000")
            .with_spindle_tool(1, "T1")
            .with_gang_slot(1, GangSlot::new("D5", 0.0, 1.26)),
    );
    DataLibrary::new(tools, operations, routers)
}

fn square(size: f64) -> ChainGeometry {
    ChainGeometry {
        points: vec![
            BulgePoint::new(0.0, 0.0, 0.0),
            BulgePoint::new(size, 0.0, 0.0),
            BulgePoint::new(size, size, 0.0),
            BulgePoint::new(0.0, size, 0.0),
        ],
        closed: true,
    }
}

fn nest() -> Nest {
    let geometry = PartGeometry {
        points: vec![Feature::new(Point2::new(5.0, 5.0), "BLOCKDRILLSYSTEM", 0.0)],
        chains: vec![
            Feature::new(square(10.0), "Tray", 0.0),
            Feature::new(square(10.0), "Dovetail", 0.0),
        ],
        arcs: Vec::new(),
    };
    Nest {
        jobname: "Trays".to_string(),
        sheets: vec![Sheet {
            sheet_number: 1,
            parts: vec![Part::new("Tray", Point2::new(10.0, 10.0), Point2::new(2.0, 2.0))
                .with_geometry(geometry)],
        }],
        ..Default::default()
    }
}

/// Two 10 x 10 lobes joined by a neck narrower than the tool
fn dumbbell() -> ChainGeometry {
    let points = [
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 4.8),
        (11.0, 4.8),
        (11.0, 0.0),
        (21.0, 0.0),
        (21.0, 10.0),
        (11.0, 10.0),
        (11.0, 5.2),
        (10.0, 5.2),
        (10.0, 10.0),
        (0.0, 10.0),
    ];
    ChainGeometry {
        points: points.iter().map(|&(x, y)| BulgePoint::new(x, y, 0.0)).collect(),
        closed: true,
    }
}

#[test]
fn test_groups_in_first_appearance_order() {
    let data = data();
    let config = Config::default();
    let sheets = ToolpathGenerator::new(&data, &config).generate(&nest());
    assert_eq!(sheets.len(), 1);

    let sheet = &sheets[0];
    let names: Vec<&str> = sheet.operations.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Tray", "BLOCKDRILLSYSTEM"]);
    assert_eq!(sheet.operations[1].kind, OperationKind::BlockDrillSystem);

    assert_eq!(sheet.failures.len(), 1);
    assert_eq!(sheet.failures[0].operation, "Dovetail");
    assert_eq!(
        sheet.failures[0].error,
        ToolpathError::Lookup(LookupError::OperationNotFound {
            name: "Dovetail".to_string()
        })
    );
}

#[test]
fn test_pocket_stays_inside_shape() {
    let data = data();
    let config = Config::default();
    let sheets = ToolpathGenerator::new(&data, &config).generate(&nest());
    let pocket = &sheets[0].operations[0];
    assert_eq!(pocket.toolpaths.len(), 1);

    let toolpath = &pocket.toolpaths[0];
    let cuts = toolpath
        .segments
        .iter()
        .filter(|s| s.segment_type == ToolpathSegmentType::LinearMove)
        .count();
    assert!(cuts > 40);

    // Sheet space is shifted by the part origin; the tool keeps a radius off the wall
    let inner = Rect2::new(Point2::new(2.249, 2.249), Point2::new(9.502, 9.502));
    for segment in &toolpath.segments {
        assert!(inner.contains(segment.end), "{:?} leaves the pocket", segment.end);
    }
    assert!(toolpath.segments.iter().all(|s| s.z == -0.25 || s.z == 0.5));
}

#[test]
fn test_emit_gang_drill() {
    let data = data();
    let config = Config::default();
    let sheets = ToolpathGenerator::new(&data, &config).generate(&nest());

    let router = data.routers.get_router_by_id("R1").unwrap();
    let tree = Emitter::new(router, OutputConfig::default(), "Trays")
        .emit(&sheets[0])
        .unwrap();
    let script = tree.script();
    assert!(script.starts_with(";Trays sheet 1\nJOBSTART\n"));
    assert!(script.contains("DRILL T1 F150 S6000\n\nDRILL X7 Y5.74 Z-0.5\n"));
    assert!(script.ends_with("JOBEND ;End of job\n\n\n"));
}

#[test]
fn test_pocket_clears_both_lobes() {
    let geometry = PartGeometry {
        chains: vec![Feature::new(dumbbell(), "Tray", 0.0)],
        ..Default::default()
    };
    let nest = Nest {
        jobname: "Bells".to_string(),
        sheets: vec![Sheet {
            sheet_number: 1,
            parts: vec![Part::new("Bells", Point2::new(21.0, 10.0), Point2::ZERO).with_geometry(geometry)],
        }],
        ..Default::default()
    };

    let data = data();
    let config = Config::default();
    let sheets = ToolpathGenerator::new(&data, &config).generate(&nest);
    let pocket = &sheets[0].operations[0];
    assert_eq!(pocket.toolpaths.len(), 1);

    let segments = &pocket.toolpaths[0].segments;
    let cuts: Vec<_> = segments
        .iter()
        .filter(|s| s.segment_type == ToolpathSegmentType::LinearMove && s.z == -0.25)
        .collect();
    assert!(cuts.iter().any(|s| s.end.x < 10.0));
    assert!(cuts.iter().any(|s| s.end.x > 11.0));
    // Moving between lobes happens above the work
    for s in &cuts {
        assert_eq!(s.start.x < 10.5, s.end.x < 10.5, "{:?} crosses the neck at depth", s);
    }
}
