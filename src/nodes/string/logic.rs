//! String node computation

use super::StringMode;
use crate::nodes::propagation::NodeInputs;
use crate::nodes::socket::SocketValue;

/// Computes the output writes for a String node.
///
/// Every variant withholds computation while a required input is absent, so
/// a stale output is never overwritten with a partial result. Substring
/// additionally skips when the step component is zero.
pub fn compute(mode: StringMode, inputs: &NodeInputs) -> Vec<(String, SocketValue)> {
    match mode {
        StringMode::New => {
            let Some(text) = inputs.string("String") else {
                return Vec::new();
            };
            vec![("String".to_string(), SocketValue::from(text))]
        }
        StringMode::Concatenate => {
            let (Some(a), Some(b)) = (inputs.string("String"), inputs.string("String 2")) else {
                return Vec::new();
            };
            vec![(
                "String".to_string(),
                SocketValue::String(format!("{}{}", a, b)),
            )]
        }
        StringMode::Substring => {
            let (Some(text), Some([begin, end, step])) =
                (inputs.string("String"), inputs.int3("B:E:S"))
            else {
                return Vec::new();
            };
            if step == 0 {
                return Vec::new();
            }
            vec![(
                "String".to_string(),
                SocketValue::String(slice_chars(text, begin, end, step)),
            )]
        }
    }
}

/// Extended slice over characters with Python semantics: negative indices
/// count from the end, indices clamp to the valid range, a negative step
/// walks backwards. `step` must be non-zero.
fn slice_chars(text: &str, begin: i32, end: i32, step: i32) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len() as i64;
    let step = step as i64;
    let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
    let start = clamp_index(begin as i64, len, lower, upper);
    let stop = clamp_index(end as i64, len, lower, upper);

    let mut out = String::new();
    let mut i = start;
    if step > 0 {
        while i < stop {
            out.push(chars[i as usize]);
            i += step;
        }
    } else {
        while i > stop {
            out.push(chars[i as usize]);
            i += step;
        }
    }
    out
}

fn clamp_index(index: i64, len: i64, lower: i64, upper: i64) -> i64 {
    let shifted = if index < 0 { index + len } else { index };
    shifted.clamp(lower, upper)
}
