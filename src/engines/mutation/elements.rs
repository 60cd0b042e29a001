use crate::engines::genome::gene::StructureOp;
use crate::engines::genome::pitch::PitchToken;
use rand::seq::SliceRandom;
use rand::Rng;

const REST_REPLACEMENTS: [&str; 7] = ["c4", "d4", "e4", "f4", "g4", "a4", "b4"];
pub const DELAY_STEPS: [f64; 4] = [0.125, 0.25, 0.5, 0.75];

const SPEED_MIN: f64 = 0.25;
const SPEED_MAX: f64 = 8.0;

/// Valid parameter domain of an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectRange {
    Continuous { min: f64, max: f64 },
    Discrete(&'static [f64]),
}

pub fn effect_range(effect: &str) -> Option<EffectRange> {
    let range = match effect {
        "reverb" | "room" | "size" | "distort" | "distortion" | "shape" | "chorus" | "pan" => {
            EffectRange::Continuous { min: 0.0, max: 1.0 }
        }
        "gain" => EffectRange::Continuous { min: 0.1, max: 2.0 },
        "lpf" | "cutoff" | "hpf" | "hcutoff" => EffectRange::Continuous {
            min: 20.0,
            max: 20000.0,
        },
        "crush" => EffectRange::Continuous { min: 1.0, max: 16.0 },
        "delay" => EffectRange::Discrete(&DELAY_STEPS),
        _ => return None,
    };
    Some(range)
}

/// Swap a drum hit for a close relative; unknown tokens pass through
pub fn mutate_rhythm_token<R: Rng>(token: &str, rng: &mut R) -> String {
    let options: &[&str] = match token {
        "bd" => &["bd*2", "bd*4", "kick"],
        "sd" => &["sd*2", "snare", "clap"],
        "hh" => &["hh*2", "hihat", "ch"],
        "~" => &["bd", "sd", "hh"],
        _ => return token.to_string(),
    };
    options
        .choose(rng)
        .map(|choice| choice.to_string())
        .unwrap_or_else(|| token.to_string())
}

/// 50% semitone step, else 30% octave jump, else untouched.
/// Rests turn into a concrete pitch.
pub fn mutate_pitch<R: Rng>(token: &PitchToken, rng: &mut R) -> PitchToken {
    match token {
        PitchToken::Rest => REST_REPLACEMENTS
            .choose(rng)
            .map(|note| PitchToken::parse(note))
            .unwrap_or(PitchToken::Rest),
        PitchToken::Raw(_) => token.clone(),
        PitchToken::Note { .. } => {
            if rng.gen_bool(0.5) {
                token.transpose(if rng.gen_bool(0.5) { 1 } else { -1 })
            } else if rng.gen_bool(0.3) {
                token.shift_octave(if rng.gen_bool(0.5) { 1 } else { -1 })
            } else {
                token.clone()
            }
        }
    }
}

pub fn mutate_effect_param<R: Rng>(effect: &str, param: &str, rng: &mut R) -> String {
    let Some(range) = effect_range(effect) else {
        return param.to_string();
    };
    match range {
        EffectRange::Discrete(steps) => steps
            .choose(rng)
            .map(|step| step.to_string())
            .unwrap_or_else(|| param.to_string()),
        EffectRange::Continuous { min, max } => {
            let Ok(current) = param.trim().parse::<f64>() else {
                return param.to_string();
            };
            let magnitude = rng.gen_range(0.15..=0.30) * (max - min);
            let delta = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
            format_number((current + delta).clamp(min, max))
        }
    }
}

/// Speed factors scale by [0.7, 1.3]; other operators keep their argument
pub fn mutate_structure_param<R: Rng>(op: StructureOp, argument: &str, rng: &mut R) -> String {
    if !op.is_speed_scale() {
        return argument.to_string();
    }
    let current = argument.trim().parse::<f64>().unwrap_or(2.0);
    let factor = rng.gen_range(0.7..=1.3);
    format_number((current * factor).clamp(SPEED_MIN, SPEED_MAX))
}

/// Two decimals at most, no trailing zeros
pub fn format_number(value: f64) -> String {
    let text = format!("{:.2}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
