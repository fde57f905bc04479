//! ensure serde is working as expected

use super::*;

#[test]
fn test_serde() {
    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct MyTypes {
        f1: Fixed,
        f2: F2Dot14,
        gid: GlyphId,
        name_id: NameId,
        tag: Tag,
        version1: MajorMinor,
        version2: Version16Dot16,
        bbox: BoundingBox<i16>,
        event: OutlineEvent,
    }

    let my_instance = MyTypes {
        f1: Fixed::from_f64(521.5),
        f2: F2Dot14::from_f32(1.25),
        gid: GlyphId::new(69),
        name_id: NameId::new(8214),
        tag: Tag::new(b"cool"),
        version1: MajorMinor::new(10, 5),
        version2: Version16Dot16::VERSION_2_5,
        bbox: BoundingBox {
            x_min: 3,
            y_min: 0,
            x_max: 541,
            y_max: 656,
        },
        event: OutlineEvent::QuadTo {
            cx0: 1.0,
            cy0: 2.0,
            x: 3.0,
            y: 4.0,
        },
    };

    let dumped = serde_json::to_string(&my_instance).unwrap();
    let loaded: MyTypes = serde_json::from_str(&dumped).unwrap();
    assert_eq!(my_instance, loaded)
}
