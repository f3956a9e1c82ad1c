//! Shared helpers: an LZ4s block builder, a greedy LZ4s compressor and reference
//! decoders for LZ4s, S2 and Snappy block bodies.
#![allow(dead_code)]

/// Builds LZ4s blocks one sequence at a time.
#[derive(Default)]
pub struct Lz4sBuilder {
    out: Vec<u8>,
    offset_positions: Vec<usize>,
}

impl Lz4sBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends literals followed by a match of `length` (>= 4) bytes at `offset`.
    pub fn sequence(&mut self, literals: &[u8], offset: u16, length: usize) -> &mut Self {
        assert!(length >= 4, "LZ4s matches are at least 4 bytes");
        let ml = length - 3;
        self.token(literals, ml.min(15) as u8);
        self.offset_positions.push(self.out.len());
        self.out.extend_from_slice(&offset.to_le_bytes());
        if ml >= 15 {
            push_ext(&mut self.out, ml - 15);
        }
        self
    }

    /// Appends a sequence with a zero-length match marker.
    pub fn literals(&mut self, literals: &[u8]) -> &mut Self {
        self.token(literals, 0);
        self
    }

    /// Appends the terminal sequence and returns the block.
    pub fn finish(&mut self, literals: &[u8]) -> Vec<u8> {
        self.token(literals, 0);
        std::mem::take(&mut self.out)
    }

    /// Byte positions of every offset field written so far.
    pub fn offset_positions(&self) -> &[usize] {
        &self.offset_positions
    }

    fn token(&mut self, literals: &[u8], match_code: u8) {
        let ll = literals.len();
        self.out.push((ll.min(15) as u8) << 4 | match_code);
        if ll >= 15 {
            push_ext(&mut self.out, ll - 15);
        }
        self.out.extend_from_slice(literals);
    }
}

fn push_ext(out: &mut Vec<u8>, mut rem: usize) {
    while rem >= 255 {
        out.push(255);
        rem -= 255;
    }
    out.push(rem as u8);
}

/// Greedy single-probe LZ4s compressor. Returns the block and its offset positions.
pub fn compress_lz4s(data: &[u8]) -> (Vec<u8>, Vec<usize>) {
    const HASH_BITS: u32 = 14;
    let mut table = vec![usize::MAX; 1 << HASH_BITS];
    let mut builder = Lz4sBuilder::new();
    let mut anchor = 0;
    let mut i = 0;

    while i + 4 <= data.len() {
        let key = u32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
        let h = (key.wrapping_mul(2_654_435_761) >> (32 - HASH_BITS)) as usize;
        let cand = table[h];
        table[h] = i;

        if cand != usize::MAX && i - cand <= 65_535 && data[cand..cand + 4] == data[i..i + 4] {
            let mut len = 4;
            while i + len < data.len() && data[cand + len] == data[i + len] {
                len += 1;
            }
            builder.sequence(&data[anchor..i], (i - cand) as u16, len);
            i += len;
            anchor = i;
        } else {
            i += 1;
        }
    }

    let positions = builder.offset_positions().to_vec();
    (builder.finish(&data[anchor..]), positions)
}

/// Straightforward LZ4s decoder used as the source of truth.
pub fn decode_lz4s(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut s = 0;
    loop {
        let token = src[s];
        s += 1;
        let mut ll = (token >> 4) as usize;
        if ll == 15 {
            loop {
                let v = src[s];
                s += 1;
                ll += v as usize;
                if v != 255 {
                    break;
                }
            }
        }
        out.extend_from_slice(&src[s..s + ll]);
        s += ll;

        let code = (token & 0xF) as usize;
        if code == 0 {
            if s == src.len() {
                return out;
            }
            continue;
        }
        let offset = u16::from_le_bytes([src[s], src[s + 1]]) as usize;
        s += 2;
        let mut ml = 3 + code;
        if code == 15 {
            loop {
                let v = src[s];
                s += 1;
                ml += v as usize;
                if v != 255 {
                    break;
                }
            }
        }
        copy_match(&mut out, offset, ml).expect("reference LZ4s block is valid");
    }
}

/// Tag counts observed while decoding an S2 or Snappy block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TagStats {
    pub literals: usize,
    pub copy1: usize,
    pub copy2: usize,
    pub repeats: usize,
}

impl TagStats {
    pub fn matches(&self) -> usize {
        self.copy1 + self.copy2 + self.repeats
    }
}

/// Decodes an S2 block body (no length prefix).
pub fn decode_s2(src: &[u8]) -> Result<(Vec<u8>, TagStats), String> {
    decode_block(src, true)
}

/// Decodes a Snappy block body (no length prefix).
pub fn decode_snappy(src: &[u8]) -> Result<(Vec<u8>, TagStats), String> {
    decode_block(src, false)
}

fn decode_block(src: &[u8], repeats: bool) -> Result<(Vec<u8>, TagStats), String> {
    let mut out = Vec::new();
    let mut stats = TagStats::default();
    let mut last_offset = 0usize;
    let mut s = 0;

    while s < src.len() {
        let b0 = src[s];
        match b0 & 0x03 {
            0x00 => {
                let x = (b0 >> 2) as usize;
                let len = if x < 60 {
                    s += 1;
                    x + 1
                } else {
                    let n = x - 59;
                    let mut raw = [0u8; 4];
                    raw[..n].copy_from_slice(take(src, s + 1, n)?);
                    s += 1 + n;
                    u32::from_le_bytes(raw) as usize + 1
                };
                out.extend_from_slice(take(src, s, len)?);
                s += len;
                stats.literals += 1;
            }
            0x01 => {
                let b = take(src, s, 2)?;
                s += 2;
                let mut length = ((b[0] >> 2) & 0x07) as usize;
                let toffset = ((b[0] as usize & 0xE0) << 3) | b[1] as usize;
                if toffset == 0 {
                    if !repeats {
                        return Err(format!("zero copy1 offset at {}", s - 2));
                    }
                    length = match length {
                        5 => {
                            let v = take(src, s, 1)?[0] as usize;
                            s += 1;
                            v + 4
                        }
                        6 => {
                            let v = take(src, s, 2)?;
                            s += 2;
                            u16::from_le_bytes([v[0], v[1]]) as usize + (1 << 8)
                        }
                        7 => {
                            let v = take(src, s, 3)?;
                            s += 3;
                            u32::from_le_bytes([v[0], v[1], v[2], 0]) as usize + (1 << 16)
                        }
                        other => other,
                    };
                    stats.repeats += 1;
                } else {
                    last_offset = toffset;
                    stats.copy1 += 1;
                }
                copy_match(&mut out, last_offset, length + 4)?;
            }
            0x02 => {
                let b = take(src, s, 3)?;
                s += 3;
                let length = (b[0] >> 2) as usize + 1;
                last_offset = u16::from_le_bytes([b[1], b[2]]) as usize;
                stats.copy2 += 1;
                copy_match(&mut out, last_offset, length)?;
            }
            _ => return Err(format!("unexpected copy4 tag at {s}")),
        }
    }

    Ok((out, stats))
}

fn take(src: &[u8], s: usize, n: usize) -> Result<&[u8], String> {
    src.get(s..s + n)
        .ok_or_else(|| format!("truncated tag at {s} (need {n} bytes)"))
}

fn copy_match(out: &mut Vec<u8>, offset: usize, length: usize) -> Result<(), String> {
    if offset == 0 || offset > out.len() {
        return Err(format!("offset {offset} out of range (have {})", out.len()));
    }
    if offset == 1 {
        let last = out[out.len() - 1];
        out.resize(out.len() + length, last);
        return Ok(());
    }
    let start = out.len() - offset;
    for k in 0..length {
        let v = out[start + k];
        out.push(v);
    }
    Ok(())
}

/// Deterministic high-entropy bytes.
pub fn generate_random(size: usize) -> Vec<u8> {
    let mut seed: u64 = 0xDEAD_BEEF;
    (0..size)
        .map(|_| {
            seed = (seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)) & 0xFFFF_FFFF;
            (seed >> 24) as u8
        })
        .collect()
}

/// Repeated English text, truncated to `size`.
pub fn generate_text(size: usize) -> Vec<u8> {
    let text = b"The quick brown fox jumps over the lazy dog. ";
    text.iter().copied().cycle().take(size).collect()
}
