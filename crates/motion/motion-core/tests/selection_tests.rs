use motion_core::{
    BoneKeyframe, Channel, ChannelMask, LightKeyframe, MorphKeyframe, Motion, SelectionSnapshot,
};

#[test]
fn snapshot_round_trip_survives_reload() {
    let mut motion = Motion::new(0);
    motion.add_bone_keyframe(BoneKeyframe::new("Head", 30)).unwrap();
    motion.selection_mut().add_named(Channel::Bone, "Head", 30);

    let snapshot = motion.save_selection_snapshot();
    motion.clear_all_keyframes();
    assert!(motion.selection().is_empty());

    // Reload identical keyframe data, then restore.
    motion.add_bone_keyframe(BoneKeyframe::new("Head", 30)).unwrap();
    motion.restore_selection_snapshot(&snapshot);
    assert!(motion.selection().contains_named(Channel::Bone, "Head", 30));
}

#[test]
fn restore_drops_tuples_that_no_longer_resolve() {
    let mut motion = Motion::new(0);
    motion.add_bone_keyframe(BoneKeyframe::new("Head", 30)).unwrap();
    motion.add_light_keyframe(LightKeyframe::new(4)).unwrap();
    motion.selection_mut().add_named(Channel::Bone, "Head", 30);
    motion.selection_mut().add_frame(Channel::Light, 4);

    let snapshot = motion.save_selection_snapshot();
    motion.clear_all_keyframes();
    // Only the light keyframe comes back.
    motion.add_light_keyframe(LightKeyframe::new(4)).unwrap();
    motion.restore_selection_snapshot(&snapshot);

    assert!(motion.selection().contains_frame(Channel::Light, 4));
    assert!(!motion.selection().contains_named(Channel::Bone, "Head", 30));
    assert_eq!(motion.selection().count(Channel::Bone), 0);
}

#[test]
fn snapshot_serializes_through_json() {
    let mut motion = Motion::new(0);
    motion.add_morph_keyframe(MorphKeyframe::new("smile", 12)).unwrap();
    motion.selection_mut().add_named(Channel::Morph, "smile", 12);

    let snapshot = motion.save_selection_snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: SelectionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);

    let mut reloaded = Motion::new(1);
    reloaded.add_morph_keyframe(MorphKeyframe::new("smile", 12)).unwrap();
    reloaded.restore_selection_snapshot(&parsed);
    assert!(reloaded.selection().contains_named(Channel::Morph, "smile", 12));
}

#[test]
fn selected_keyframes_come_back_in_store_order_with_base_frame() {
    let mut motion = Motion::new(0);
    motion.add_bone_keyframe(BoneKeyframe::new("arm", 30)).unwrap();
    motion.add_bone_keyframe(BoneKeyframe::new("arm", 10)).unwrap();
    motion.add_bone_keyframe(BoneKeyframe::new("arm", 20)).unwrap();
    motion.selection_mut().add_named(Channel::Bone, "arm", 30);
    motion.selection_mut().add_named(Channel::Bone, "arm", 10);

    let (keyframes, base) = motion.selected_bone_keyframes();
    let frames: Vec<u32> = keyframes.iter().map(|k| k.frame_index).collect();
    assert_eq!(frames, vec![10, 30]);
    // The zero-basing offset for copy/paste.
    assert_eq!(base, Some(10));
}

#[test]
fn select_all_and_has_all_follow_the_mask() {
    let mut motion = Motion::new(0);
    motion.add_light_keyframe(LightKeyframe::new(1)).unwrap();
    motion.add_light_keyframe(LightKeyframe::new(2)).unwrap();
    motion.add_bone_keyframe(BoneKeyframe::new("arm", 1)).unwrap();

    motion.select_all_keyframes(ChannelMask::LIGHT);
    assert!(motion.has_all_keyframes(ChannelMask::LIGHT));
    assert!(!motion.has_all_keyframes(ChannelMask::LIGHT | ChannelMask::BONE));

    motion.select_all_keyframes(ChannelMask::ALL);
    assert!(motion.has_all_keyframes(ChannelMask::ALL));
}

#[test]
fn range_selection_is_inclusive() {
    let mut motion = Motion::new(0);
    for frame in [4u32, 5, 9, 10, 11] {
        motion.add_light_keyframe(LightKeyframe::new(frame)).unwrap();
    }
    motion.select_keyframes_in(Channel::Light, 5, 10);
    let selected: Vec<u32> = motion.selection().frames(Channel::Light).collect();
    assert_eq!(selected, vec![5, 9, 10]);

    let mut motion = Motion::new(1);
    for frame in [0u32, 8, 16] {
        motion.add_bone_keyframe(BoneKeyframe::new("arm", frame)).unwrap();
        motion.add_bone_keyframe(BoneKeyframe::new("leg", frame)).unwrap();
    }
    motion.select_bone_keyframes_in("arm", 0, 8);
    assert!(motion.selection().contains_named(Channel::Bone, "arm", 0));
    assert!(motion.selection().contains_named(Channel::Bone, "arm", 8));
    assert!(!motion.selection().contains_named(Channel::Bone, "arm", 16));
    assert!(!motion.selection().contains_named(Channel::Bone, "leg", 0));
}
