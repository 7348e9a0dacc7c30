// Model loading and teardown through the public sequencer API.

use hoop_core::{
    AssetError, ExperienceConfig, ModelAsset, ModelHandle, ModelSlot, ResourceRelease, Sequencer,
    StageId,
};

#[derive(Default)]
struct Releaser {
    released: Vec<ModelHandle>,
}

impl ResourceRelease for Releaser {
    fn release(&mut self, handle: ModelHandle) {
        self.released.push(handle);
    }
}

fn tiny_glb() -> Vec<u8> {
    let json = b"{\"asset\":{}}";
    let mut out = Vec::new();
    out.extend_from_slice(&0x4654_6C67u32.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&((12 + 8 + json.len()) as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    out.extend_from_slice(json);
    out
}

#[test]
fn each_loaded_model_is_released_exactly_once() {
    let mut seq = Sequencer::new(&ExperienceConfig::default());
    let mut handles = Vec::new();
    for id in StageId::ALL {
        let asset = ModelAsset::from_glb_bytes(id.name(), &tiny_glb());
        handles.push(seq.attach_model(id, asset).expect("fresh stage accepts a model"));
    }

    let mut rel = Releaser::default();
    seq.dispose(&mut rel);
    seq.dispose(&mut rel);
    assert_eq!(rel.released, handles);
    for id in StageId::ALL {
        assert!(matches!(seq.stage(id).model(), ModelSlot::Disposed));
    }
}

#[test]
fn late_load_after_dispose_is_rejected() {
    let mut seq = Sequencer::new(&ExperienceConfig::default());
    let mut rel = Releaser::default();
    seq.dispose(&mut rel);
    assert!(rel.released.is_empty());

    let late = ModelAsset::from_glb_bytes("late", &tiny_glb());
    assert!(seq.attach_model(StageId::Hoop, late).is_none());
    let mut draws = Vec::new();
    seq.drawables(&mut draws);
    assert!(draws.is_empty());
}

#[test]
fn failed_load_leaves_the_chain_working() {
    let mut seq = Sequencer::new(&ExperienceConfig::default());
    let err = AssetError::Fetch {
        path: "assets/models/basketball.glb".into(),
        reason: "404".into(),
    };
    assert!(seq.attach_model(StageId::Intro, Err(err)).is_none());
    assert!(matches!(seq.stage(StageId::Intro).model(), ModelSlot::Failed));

    for _ in 0..20 {
        seq.wheel(600.0);
    }
    for _ in 0..360 {
        seq.update(1.0 / 60.0);
    }
    assert!(seq.stage(StageId::Hoop).track().is_armed());
}

#[test]
fn truncated_container_is_an_error() {
    let bytes = tiny_glb();
    let err = ModelAsset::from_glb_bytes("cut", &bytes[..bytes.len() - 4]).unwrap_err();
    assert!(matches!(err, AssetError::LengthMismatch { .. }));
}
