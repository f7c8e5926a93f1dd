//! Cross-dialect properties of generated programs.

use postforge_math::{euler_to_quaternion, normal_to_euler, tool_frame, EulerZyx, Vec3};
use postforge_post::{Dialect, GenerationEngine, GeneratorConfig, HookPoint};
use postforge_toolpath::{SegmentKind, Toolpath, ToolpathSegment};

fn mixed_toolpath() -> Toolpath {
    Toolpath::new(vec![
        ToolpathSegment::new(SegmentKind::Travel, 0, vec![[0.0, 0.0, 5.0]], 200.0),
        ToolpathSegment::new(
            SegmentKind::Perimeter,
            0,
            vec![[10.0, 20.0, 0.0], [30.0, 20.0, 0.0], [30.0, 40.0, 0.0]],
            47.0,
        ),
        ToolpathSegment::new(
            SegmentKind::Infill,
            0,
            vec![[12.0, 22.0, 0.0], [28.0, 38.0, 0.0]],
            60.0,
        ),
        ToolpathSegment::new(SegmentKind::Travel, 0, vec![], 200.0),
        ToolpathSegment::new(SegmentKind::Travel, 1, vec![[10.0, 20.0, 0.2]], 200.0),
        ToolpathSegment::new(
            SegmentKind::Perimeter,
            1,
            vec![[10.0, 20.0, 0.2], [30.0, 20.0, 0.2]],
            47.0,
        ),
        ToolpathSegment::new(
            SegmentKind::Support,
            2,
            vec![[5.0, 5.0, 0.4], [6.0, 5.0, 0.4]],
            30.0,
        )
        .with_normal([0.0, 0.0, 2.0]),
    ])
}

fn marker_config(dialect: Dialect) -> GeneratorConfig {
    let mut config = GeneratorConfig::for_dialect(dialect);
    for point in HookPoint::all() {
        config.hooks.set(point, format!("HOOK {} L{{layerIndex}}", point.key()));
    }
    config
}

fn markers(text: &str, point: HookPoint) -> Vec<String> {
    let tag = format!("HOOK {} ", point.key());
    text.lines()
        .filter_map(|l| {
            l.find(&tag)
                .map(|i| l[i + tag.len()..].trim_end_matches(';').trim().to_string())
        })
        .collect()
}

#[test]
fn test_point_count_invariant() {
    let toolpath = mixed_toolpath();
    let expected: usize = toolpath.segments.iter().map(|s| s.points.len()).sum();
    for dialect in Dialect::all() {
        let program = GenerationEngine::for_dialect(dialect).generate_program(&toolpath);
        assert_eq!(program.motion_count, expected, "{dialect}");

        let text = GenerationEngine::new(marker_config(dialect)).generate(&toolpath);
        assert_eq!(markers(&text, HookPoint::BeforePoint).len(), expected);
        assert_eq!(markers(&text, HookPoint::AfterPoint).len(), expected);
    }
}

#[test]
fn test_process_bracketing() {
    let toolpath = mixed_toolpath();
    for dialect in Dialect::all() {
        let text = GenerationEngine::new(marker_config(dialect)).generate(&toolpath);
        let mut active = false;
        let mut on = 0;
        let mut off = 0;
        for line in text.lines() {
            if line.contains("HOOK process_on ") {
                assert!(!active, "{dialect}: process on while active");
                active = true;
                on += 1;
            } else if line.contains("HOOK process_off ") {
                assert!(active, "{dialect}: process off while idle");
                active = false;
                off += 1;
            }
        }
        assert!(!active);
        assert_eq!(on, off);
        // Layer 0 perimeter and infill form one run; layer 1 perimeter and
        // layer 2 support form the second.
        assert_eq!(on, 2, "{dialect}");
    }
}

#[test]
fn test_layer_bracketing() {
    let toolpath = mixed_toolpath();
    for dialect in Dialect::all() {
        let text = GenerationEngine::new(marker_config(dialect)).generate(&toolpath);
        let starts = markers(&text, HookPoint::LayerStart);
        let ends = markers(&text, HookPoint::LayerEnd);
        assert_eq!(starts, vec!["L0", "L1", "L2"], "{dialect}");
        assert_eq!(ends.len(), starts.len());
    }
}

#[test]
fn test_idempotence() {
    let toolpath = mixed_toolpath();
    for dialect in Dialect::all() {
        let engine = GenerationEngine::new(marker_config(dialect));
        assert_eq!(engine.generate(&toolpath), engine.generate(&toolpath));
    }
}

#[test]
fn test_program_framing() {
    let toolpath = mixed_toolpath();
    let text = |d| GenerationEngine::for_dialect(d).generate(&toolpath);

    let gcode = text(Dialect::Gcode);
    let units = gcode.find("G21").unwrap();
    assert!(units < gcode.find("G0 ").unwrap());

    let rapid = text(Dialect::Rapid);
    assert!(rapid.starts_with("MODULE "));
    assert!(rapid.contains("  PROC main()\n"));
    assert!(rapid.ends_with("  ENDPROC\nENDMODULE\n"));

    let krl = text(Dialect::Krl);
    assert!(krl.starts_with("DEF "));
    assert!(krl.ends_with("END\n"));

    let fanuc = text(Dialect::Fanuc);
    assert!(fanuc.starts_with("/PROG  "));
    let mn = fanuc.find("/MN\n").unwrap();
    let pos = fanuc.find("/POS\n").unwrap();
    assert!(mn < pos);
    assert!(fanuc.ends_with("/END\n"));
    let records = fanuc.matches("\n   GP1:").count();
    assert_eq!(records, 11);
}

#[test]
fn test_rapid_speed_lookup_scenario() {
    let toolpath = Toolpath::new(vec![ToolpathSegment::new(
        SegmentKind::Perimeter,
        0,
        vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]],
        47.0,
    )]);
    let text = GenerationEngine::for_dialect(Dialect::Rapid).generate(&toolpath);
    let moves: Vec<&str> = text.lines().filter(|l| l.contains("MoveL")).collect();
    assert_eq!(moves.len(), 1);
    assert!(moves[0].contains(",v50,"));
}

#[test]
fn test_orientation_round_trip() {
    let normals = [
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 0.3, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(-0.2, 0.5, 0.8),
        Vec3::new(1.0, 0.0, 0.0),
    ];
    for n in normals {
        let e = normal_to_euler(&n);
        let from_quat = euler_to_quaternion(e.yaw, e.pitch, e.roll).to_matrix();
        let direct = tool_frame(&n).unwrap();
        assert!((from_quat - direct).abs().max() < 1e-9, "normal {n:?}");
    }
}

fn tilted_toolpath(normal: [f64; 3]) -> Toolpath {
    Toolpath::new(vec![ToolpathSegment::new(
        SegmentKind::Machining,
        0,
        vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]],
        20.0,
    )
    .with_normal(normal)])
}

const TILTED_NORMALS: [[f64; 3]; 4] = [
    [1.0, 0.0, 1.0],
    [0.0, -0.5, 1.0],
    [-0.2, 0.5, 0.8],
    [0.3, 0.4, -1.0],
];

fn expected_orientation(normal: [f64; 3]) -> EulerZyx {
    normal_to_euler(&Vec3::new(normal[0], normal[1], normal[2]))
}

fn angle_diff_deg(a: f64, b: f64) -> f64 {
    ((a - b + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// The `[qw,qx,qy,qz]` group of a RAPID robtarget.
fn robtarget_quaternion(line: &str) -> Vec<f64> {
    let start = line.find("],[").unwrap() + 3;
    let end = start + line[start..].find(']').unwrap();
    line[start..end]
        .split(',')
        .map(|v| v.parse().unwrap())
        .collect()
}

#[test]
fn test_rapid_quaternion_for_tilted_normals() {
    for normal in TILTED_NORMALS {
        let e = expected_orientation(normal);
        let expected = euler_to_quaternion(e.yaw, e.pitch, e.roll).to_array();

        let rapid = GenerationEngine::for_dialect(Dialect::Rapid).generate(&tilted_toolpath(normal));
        let targets: Vec<&str> = rapid
            .lines()
            .filter(|l| l.contains("MoveL ") || l.contains("MoveJ "))
            .collect();
        assert_eq!(targets.len(), 2, "{normal:?}");
        assert!(targets[1].contains("MoveL "));
        for line in targets {
            let q = robtarget_quaternion(line);
            assert_eq!(q.len(), 4, "{line}");
            for (got, want) in q.iter().zip(expected) {
                assert!((got - want).abs() < 1e-6, "{normal:?}: {line}");
            }
        }
    }
}

#[test]
fn test_fanuc_wpr_for_tilted_normals() {
    for normal in TILTED_NORMALS {
        let e = expected_orientation(normal);
        let fanuc = GenerationEngine::for_dialect(Dialect::Fanuc).generate(&tilted_toolpath(normal));
        let records: Vec<&str> = fanuc.lines().filter(|l| l.starts_with("\tW = ")).collect();
        assert_eq!(records.len(), 2, "{normal:?}");
        for line in records {
            let values: Vec<f64> = line
                .split(',')
                .map(|part| part.split_whitespace().nth(2).unwrap().parse().unwrap())
                .collect();
            assert_eq!(values.len(), 3, "{line}");
            assert!(angle_diff_deg(values[0], e.roll_deg()) < 1e-3, "W in {line}");
            assert!(angle_diff_deg(values[1], e.pitch_deg()) < 1e-3, "P in {line}");
            assert!(angle_diff_deg(values[2], e.yaw_deg()) < 1e-3, "R in {line}");
        }
    }
}

#[test]
fn test_tilted_normal_reaches_robot_targets() {
    let toolpath = tilted_toolpath([1.0, 0.0, 1.0]);

    let krl = GenerationEngine::for_dialect(Dialect::Krl).generate(&toolpath);
    let lin = krl.lines().find(|l| l.starts_with("LIN ")).unwrap();
    assert!(lin.contains("B -45.000") || lin.contains("B 45.000"), "{lin}");

    let gcode = GenerationEngine::for_dialect(Dialect::Gcode).generate(&toolpath);
    for line in gcode.lines().filter(|l| l.starts_with("G1 ")) {
        assert_eq!(line.split_whitespace().count(), 5, "{line}");
    }
}
