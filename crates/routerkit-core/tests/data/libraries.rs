use routerkit_core::data::*;
use routerkit_core::LookupError;

const TOOLS: &str = r#"[
    {"id": "T1", "cut_diameter": 0.375, "shank_diameter": 0.375, "cut_length": 1.25,
     "flutes": 2, "flute_type": "compression", "shape": "flat", "material": "carbide",
     "max_rpm": 24000, "name": "3/8 Compression", "meta": {"coating": "TiAlN"},
     "supplier": "Onsrud", "model": "60-124"},
    {"id": "D5", "cut_diameter": 0.197, "name": "5mm Drill"}
]"#;

const OPERATIONS: &str = r#"[
    {"name": "PartCut", "type": "cut", "tool": "T1", "ramp": 5.0, "feed_rate": 600,
     "plunge_rate": 200, "spindle_rpm": 18000, "offset": "right", "cut_depth": 0.75,
     "cut_height": 0.0, "feed_height": 0.5},
    {"name": "BLOCKDRILLSYSTEM", "type": "", "tool": "D5", "feed_rate": 300,
     "plunge_rate": 150, "spindle_rpm": 6000, "offset": "", "cut_depth": 0.5}
]"#;

const ROUTERS: &str = r#"[
    {"id": "R1", "name": "Multicam 3000",
     "spindle": {"1": "T1", "2": "", "3": "", "4": "", "5": "", "6": "",
                 "7": "", "8": "", "9": "", "10": "", "11": "", "12": ""},
     "gangdrill": {"1": {"tool": "D5", "x": 0.0, "y": 1.26},
                   "2": {"tool": "D5", "x": 1.26, "y": 0.0}}}
]"#;

#[test]
fn test_from_json_strs() {
    let data = DataLibrary::from_json_strs(TOOLS, OPERATIONS, ROUTERS).unwrap();
    assert_eq!(data.tools.len(), 2);
    assert_eq!(data.operations.list_operations_by_name(), vec!["PartCut", "BLOCKDRILLSYSTEM"]);

    let tool = data.tools.get_tool("T1").unwrap();
    assert_eq!(tool.max_rpm, 24000);
    assert_eq!(tool.meta["coating"], "TiAlN");

    let op = data.operations.get_operation_by_name("PartCut").unwrap();
    assert_eq!(op.offset, OffsetSide::Right);
    assert_eq!(op.ramp, 5.0);

    let router = data.routers.get_router_by_name("Multicam 3000").unwrap();
    assert_eq!(router.spindle_slot_of("T1"), Some(1));
    assert_eq!(router.gang_slot_of("D5"), Some(1));
    assert_eq!(router.gang_slot(2).unwrap().offset_x, 1.26);
}

#[test]
fn test_missing_records() {
    let data = DataLibrary::from_json_strs(TOOLS, OPERATIONS, ROUTERS).unwrap();
    assert!(matches!(
        data.routers.get_router_by_id("R9"),
        Err(LookupError::RouterNotFound { .. })
    ));
    assert!(matches!(
        data.tools.get_tool_by_name("1/4 Downcut"),
        Err(LookupError::ToolNotFound { .. })
    ));
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(TOOL_LIBRARY_FILE), TOOLS).unwrap();
    std::fs::write(dir.path().join(OPERATION_LIBRARY_FILE), OPERATIONS).unwrap();
    std::fs::write(dir.path().join(ROUTER_LIBRARY_FILE), ROUTERS).unwrap();

    let data = DataLibrary::load_from_dir(dir.path()).unwrap();
    assert_eq!(data.routers.list_routers_by_name(), vec!["Multicam 3000"]);
}

#[test]
fn test_load_from_dir_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(TOOL_LIBRARY_FILE), TOOLS).unwrap();
    assert!(DataLibrary::load_from_dir(dir.path()).is_err());
}
