use motion_core::{
    BoneKeyframe, Channel, LightKeyframe, ModelObjects, MorphKeyframe, Motion,
};

struct StubModel {
    bones: Vec<&'static str>,
    morphs: Vec<&'static str>,
}

impl ModelObjects for StubModel {
    fn contains_bone(&self, name: &str) -> bool {
        self.bones.iter().any(|b| *b == name)
    }

    fn contains_morph(&self, name: &str) -> bool {
        self.morphs.iter().any(|m| *m == name)
    }
}

#[test]
fn expansion_relocates_midpoint_keyframe() {
    let mut motion = Motion::new(0);
    motion.add_light_keyframe(LightKeyframe::new(50)).unwrap();
    motion.scale_all_light_keyframes_in(0, 100, 2.0);
    assert!(motion.find_light_keyframe(50).is_none());
    assert!(motion.find_light_keyframe(100).is_some());
}

#[test]
fn contraction_relocates_midpoint_keyframe() {
    let mut motion = Motion::new(0);
    motion.add_light_keyframe(LightKeyframe::new(50)).unwrap();
    motion.scale_all_light_keyframes_in(0, 100, 0.5);
    assert!(motion.find_light_keyframe(50).is_none());
    assert!(motion.find_light_keyframe(25).is_some());
}

#[test]
fn contraction_probes_forward_on_collision() {
    let mut motion = Motion::new(0);
    motion.add_light_keyframe(LightKeyframe::new(10)).unwrap();
    motion.add_light_keyframe(LightKeyframe::new(11)).unwrap();
    motion.scale_all_light_keyframes_in(0, 20, 0.4);
    let frames: Vec<u32> = motion.all_light_keyframes().map(|k| k.frame_index).collect();
    assert_eq!(frames, vec![4, 5]);
}

#[test]
fn bone_scale_respects_model_membership() {
    let model = StubModel {
        bones: vec!["arm"],
        morphs: vec![],
    };
    let mut motion = Motion::new(0);
    motion.add_bone_keyframe(BoneKeyframe::new("arm", 50)).unwrap();
    motion.add_bone_keyframe(BoneKeyframe::new("ghost", 50)).unwrap();
    motion.scale_all_bone_keyframes_in(&model, 0, 100, 2.0);
    assert!(motion.find_bone_keyframe("arm", 100).is_some());
    // Names the model does not define are left untouched.
    assert!(motion.find_bone_keyframe("ghost", 50).is_some());
}

#[test]
fn morph_scale_respects_model_membership() {
    let model = StubModel {
        bones: vec![],
        morphs: vec!["smile"],
    };
    let mut motion = Motion::new(0);
    motion.add_morph_keyframe(MorphKeyframe::new("smile", 40)).unwrap();
    motion.add_morph_keyframe(MorphKeyframe::new("unknown", 40)).unwrap();
    motion.scale_all_morph_keyframes_in(&model, 0, 100, 0.5);
    assert!(motion.find_morph_keyframe("smile", 20).is_some());
    assert!(motion.find_morph_keyframe("unknown", 40).is_some());
}

#[test]
fn scaling_clears_only_the_affected_channel_selection() {
    let mut motion = Motion::new(0);
    motion.add_light_keyframe(LightKeyframe::new(50)).unwrap();
    motion.add_camera_keyframe(motion_core::CameraKeyframe::new(3)).unwrap();
    motion.selection_mut().add_frame(Channel::Light, 50);
    motion.selection_mut().add_frame(Channel::Camera, 3);

    motion.scale_all_light_keyframes_in(0, 100, 2.0);

    assert_eq!(motion.selection().count(Channel::Light), 0);
    assert!(motion.selection().contains_frame(Channel::Camera, 3));
}

#[test]
fn keyframes_outside_the_range_stay_put() {
    let mut motion = Motion::new(0);
    motion.add_light_keyframe(LightKeyframe::new(5)).unwrap();
    motion.add_light_keyframe(LightKeyframe::new(150)).unwrap();
    motion.add_light_keyframe(LightKeyframe::new(50)).unwrap();
    motion.scale_all_light_keyframes_in(0, 100, 2.0);
    let frames: Vec<u32> = motion.all_light_keyframes().map(|k| k.frame_index).collect();
    assert_eq!(frames, vec![10, 100, 150]);
}
