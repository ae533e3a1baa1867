use routerkit_toolpath::geometry::Point2;
use routerkit_toolpath::Nest;

const NEST: &str = r#"{
    "partgap": 0.25,
    "sheetsize": {"x": 96.0, "y": 48.0},
    "material": "3/4 Maple Ply",
    "jobname": "Kitchen",
    "nofits": [],
    "sheets": [
        {
            "sheet_number": 1,
            "parts": [
                {
                    "name": "Side",
                    "size": {"x": 23.25, "y": 30.0},
                    "origin": {"x": 0.5, "y": 0.5},
                    "isRotated": 1,
                    "canRotate": true,
                    "sheet": 1,
                    "partId": "P-7",
                    "unitNumber": "1",
                    "unitLetter": "A",
                    "thickness": 0.75,
                    "quantity": 2,
                    "geometry": {
                        "Chains": [
                            {
                                "operation": "PartCut",
                                "geometry": {
                                    "closed": 1,
                                    "points": [
                                        {"x": 0, "y": 0},
                                        {"x": 23.25, "y": 0},
                                        {"x": 23.25, "y": 30, "bulge": 0},
                                        {"x": 0, "y": 30}
                                    ]
                                }
                            }
                        ],
                        "Points": [
                            {"operation": "BLOCKDRILLSYSTEM", "depth": 0.5, "geometry": {"x": 2, "y": 1.5}}
                        ],
                        "Arcs": [
                            {
                                "operation": "Hinge",
                                "geometry": {"radius": 0.875, "start_angle": 0, "sweep": 6.283185307179586,
                                             "position": {"x": 3.5, "y": 0.9}}
                            }
                        ]
                    }
                }
            ]
        }
    ]
}"#;

#[test]
fn test_load_nest_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nest.json");
    std::fs::write(&path, NEST).unwrap();

    let nest = Nest::load_from_file(&path).unwrap();
    assert_eq!(nest.jobname, "Kitchen");
    assert_eq!(nest.sheetsize, Point2::new(96.0, 48.0));
    assert_eq!(nest.part_count(), 1);

    let part = &nest.sheets[0].parts[0];
    assert!(part.is_rotated);
    assert!(part.can_rotate);
    assert_eq!(part.id, "P-7");
    assert_eq!(part.quantity, 2);
    assert!(part.geometry.chains[0].geometry.closed);
    assert_eq!(part.geometry.points[0].depth, 0.5);
    assert_eq!(part.geometry.arcs[0].geometry.radius, 0.875);
    // Rotated parts are turned onto the sheet and keep their origin corner
    assert_eq!(part.place(Point2::ZERO), Point2::new(30.5, 0.5));
    assert_eq!(part.footprint().size, Point2::new(30.0, 23.25));
}

#[test]
fn test_saved_nest_reloads() {
    let nest = Nest::from_json_str(NEST).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.json");
    std::fs::write(&path, nest.to_json_string().unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"isRotated\": 1"));
    assert_eq!(Nest::load_from_file(&path).unwrap(), nest);
}

#[test]
fn test_missing_nest_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Nest::load_from_file(&dir.path().join("none.json")),
        Err(routerkit_core::Error::Io(_))
    ));
}
