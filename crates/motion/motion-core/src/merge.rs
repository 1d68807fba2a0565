//! Cross-motion merge.
//!
//! Copies every channel of a source motion into a destination under one of
//! two policies: add-only (existing destination keyframes always win) or
//! override (source payloads replace in place). Bone merges can additionally
//! synthesize left/right mirrored keyframes.

use hashbrown::HashSet;
use log::debug;

use crate::keyframe::BoneKeyframe;
use crate::motion::Motion;
use crate::store::{Keyed, KeyframeStore};

/// Left/right bone-name pairs recognized by the mirror pass. The Japanese
/// glyph prefixes are the wire convention; the ASCII prefix and suffix forms
/// cover translated rigs.
const PREFIX_PAIRS: [(&str, &str); 4] = [
    ("\u{5de6}", "\u{53f3}"), // 左 / 右
    ("\u{53f3}", "\u{5de6}"),
    ("Left", "Right"),
    ("Right", "Left"),
];
const SUFFIX_PAIRS: [(&str, &str); 2] = [("_L", "_R"), ("_R", "_L")];

/// Mirrored counterpart of a bone name, or `None` when the name carries no
/// recognized left/right marker.
pub(crate) fn mirrored_bone_name(name: &str) -> Option<String> {
    for (from, to) in PREFIX_PAIRS {
        if let Some(rest) = name.strip_prefix(from) {
            return Some(format!("{to}{rest}"));
        }
    }
    for (from, to) in SUFFIX_PAIRS {
        if let Some(rest) = name.strip_suffix(from) {
            return Some(format!("{rest}{to}"));
        }
    }
    None
}

/// Reflect a bone pose across the sagittal plane: X-translation negated,
/// orientation Y/Z components negated.
fn mirror_bone_payload(keyframe: &mut BoneKeyframe) {
    keyframe.translation[0] = -keyframe.translation[0];
    keyframe.orientation[1] = -keyframe.orientation[1];
    keyframe.orientation[2] = -keyframe.orientation[2];
}

fn merge_channel<T: Keyed + Clone>(
    source: &KeyframeStore<T>,
    dest: &mut KeyframeStore<T>,
    overwrite: bool,
) {
    let mut kept = 0usize;
    for keyframe in source.iter() {
        if overwrite {
            dest.replace(keyframe.clone());
        } else if dest.insert(keyframe.clone()).is_err() {
            kept += 1;
        }
    }
    if kept > 0 {
        debug!("merge kept {kept} existing destination keyframes");
    }
}

fn merge_bone_channel(
    source: &KeyframeStore<BoneKeyframe>,
    dest: &mut KeyframeStore<BoneKeyframe>,
    overwrite: bool,
    mirror: bool,
) {
    let mut reversed_names: HashSet<String> = HashSet::new();
    let mut kept = 0usize;
    for keyframe in source.iter() {
        let absent = !dest.contains(&keyframe.key());
        if !overwrite && !absent {
            kept += 1;
            continue;
        }
        if mirror {
            if let Some(new_name) = mirrored_bone_name(&keyframe.name) {
                // A pair is mirrored at most once per merge run, even when
                // both halves are visited; marking both names closes the
                // reverse direction too.
                if !reversed_names.contains(&new_name) {
                    reversed_names.insert(new_name.clone());
                    reversed_names.insert(keyframe.name.clone());
                    let mut mirrored = keyframe.clone();
                    mirrored.name = new_name;
                    mirror_bone_payload(&mut mirrored);
                    dest.replace(mirrored);
                }
            }
        }
        dest.replace(keyframe.clone());
    }
    if kept > 0 {
        debug!("bone merge kept {kept} existing destination keyframes");
    }
}

/// Merge every channel of `source` into `dest`. Payload data is copied by
/// value; interned curves are never shared between motions.
pub(crate) fn merge_motions(dest: &mut Motion, source: &Motion, overwrite: bool, mirror: bool) {
    merge_channel(&source.accessory, &mut dest.accessory, overwrite);
    merge_bone_channel(&source.bone, &mut dest.bone, overwrite, mirror);
    merge_channel(&source.camera, &mut dest.camera, overwrite);
    merge_channel(&source.light, &mut dest.light, overwrite);
    merge_channel(&source.model, &mut dest.model, overwrite);
    merge_channel(&source.morph, &mut dest.morph, overwrite);
    merge_channel(&source.self_shadow, &mut dest.self_shadow, overwrite);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_mirroring_recognizes_both_conventions() {
        assert_eq!(
            mirrored_bone_name("\u{5de6}\u{8155}"),
            Some("\u{53f3}\u{8155}".to_string())
        );
        assert_eq!(mirrored_bone_name("Left Arm"), Some("Right Arm".to_string()));
        assert_eq!(mirrored_bone_name("Arm_R"), Some("Arm_L".to_string()));
        assert_eq!(mirrored_bone_name("center"), None);
    }

    #[test]
    fn payload_mirror_negates_sagittal_components() {
        let mut keyframe = BoneKeyframe::new("\u{5de6}\u{8155}", 0);
        keyframe.translation = [1.0, 2.0, 3.0];
        keyframe.orientation = [0.1, 0.2, 0.3, 0.9];
        mirror_bone_payload(&mut keyframe);
        assert_eq!(keyframe.translation, [-1.0, 2.0, 3.0]);
        assert_eq!(keyframe.orientation, [0.1, -0.2, -0.3, 0.9]);
    }
}
