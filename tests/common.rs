// Builders for synthetic CFF font sets.

/// Encode an integer DICT operand in its most compact form.
pub fn cff_int(value: i32) -> Vec<u8> {
    match value {
        -107..=107 => vec![(value + 139) as u8],
        108..=1131 => {
            let value = value - 108;
            vec![((value >> 8) + 247) as u8, value as u8]
        }
        -1131..=-108 => {
            let value = -value - 108;
            vec![((value >> 8) + 251) as u8, value as u8]
        }
        -32768..=32767 => {
            let mut data = vec![28];
            data.extend_from_slice(&(value as i16).to_be_bytes());
            data
        }
        _ => cff_int5(value),
    }
}

/// Encode an integer DICT operand in the fixed five byte form.
pub fn cff_int5(value: i32) -> Vec<u8> {
    let mut data = vec![29];
    data.extend_from_slice(&value.to_be_bytes());
    data
}

/// A DICT entry with compact integer operands followed by `operator`.
pub fn dict_entry(operands: &[i32], operator: &[u8]) -> Vec<u8> {
    let mut data = operands.iter().flat_map(|&value| cff_int(value)).collect::<Vec<_>>();
    data.extend_from_slice(operator);
    data
}

/// A DICT entry with five byte operands, as used for offsets.
fn offset_entry(operands: &[usize], operator: &[u8]) -> Vec<u8> {
    let mut data = operands
        .iter()
        .flat_map(|&value| cff_int5(value as i32))
        .collect::<Vec<_>>();
    data.extend_from_slice(operator);
    data
}

/// An INDEX holding `objects`, using the smallest offset size.
pub fn index<T: AsRef<[u8]>>(objects: &[T]) -> Vec<u8> {
    let mut data = (objects.len() as u16).to_be_bytes().to_vec();
    if objects.is_empty() {
        return data;
    }

    let data_len: usize = objects.iter().map(|object| object.as_ref().len()).sum();
    let off_size = match data_len + 1 {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    };
    data.push(off_size as u8);

    let mut offset = 1;
    push_offset(&mut data, off_size, offset);
    for object in objects {
        offset += object.as_ref().len();
        push_offset(&mut data, off_size, offset);
    }
    for object in objects {
        data.extend_from_slice(object.as_ref());
    }
    data
}

fn push_offset(data: &mut Vec<u8>, off_size: usize, offset: usize) {
    data.extend_from_slice(&(offset as u32).to_be_bytes()[4 - off_size..]);
}

pub fn charset_format0(sids: &[u16]) -> Vec<u8> {
    let mut data = vec![0];
    data.extend(sids.iter().flat_map(|sid| sid.to_be_bytes()));
    data
}

pub fn charset_format1(ranges: &[(u16, u8)]) -> Vec<u8> {
    let mut data = vec![1];
    for &(first, n_left) in ranges {
        data.extend_from_slice(&first.to_be_bytes());
        data.push(n_left);
    }
    data
}

pub fn charset_format2(ranges: &[(u16, u16)]) -> Vec<u8> {
    let mut data = vec![2];
    for &(first, n_left) in ranges {
        data.extend_from_slice(&first.to_be_bytes());
        data.extend_from_slice(&n_left.to_be_bytes());
    }
    data
}

pub fn fd_select_format0(fds: &[u8]) -> Vec<u8> {
    let mut data = vec![0];
    data.extend_from_slice(fds);
    data
}

pub fn fd_select_format3(ranges: &[(u16, u8)], sentinel: u16) -> Vec<u8> {
    let mut data = vec![3];
    data.extend_from_slice(&(ranges.len() as u16).to_be_bytes());
    for &(first, fd) in ranges {
        data.extend_from_slice(&first.to_be_bytes());
        data.push(fd);
    }
    data.extend_from_slice(&sentinel.to_be_bytes());
    data
}

/// A Private DICT, optionally with a Subrs entry pointing directly after it.
fn private_dict_bytes(entries: &[u8], has_subrs: bool) -> Vec<u8> {
    let mut private = entries.to_vec();
    if has_subrs {
        // The Subrs entry itself is 6 bytes
        let length = private.len() + 6;
        private.extend(offset_entry(&[length], &[19]));
    }
    private
}

/// CharStrings that are distinct per glyph.
pub fn test_char_strings(n_glyphs: usize) -> Vec<Vec<u8>> {
    (0..n_glyphs)
        .map(|glyph_id| vec![0x8b + (glyph_id % 100) as u8, 0x8b, 21, 14])
        .collect()
}

/// A name-keyed font.
pub struct TestFont {
    pub name: &'static str,
    pub strings: Vec<&'static str>,
    /// Entries written at the start of the Top DICT.
    pub top_dict: Vec<u8>,
    pub global_subrs: Vec<Vec<u8>>,
    pub char_strings: Vec<Vec<u8>>,
    /// Entries of the Private DICT, no Private DICT is written when `None`.
    pub private_dict: Option<Vec<u8>>,
    /// Local subroutines, only written when there is a Private DICT.
    pub local_subrs: Vec<Vec<u8>>,
}

impl TestFont {
    pub fn new(name: &'static str, n_glyphs: usize) -> TestFont {
        TestFont {
            name,
            strings: Vec::new(),
            top_dict: Vec::new(),
            global_subrs: Vec::new(),
            char_strings: test_char_strings(n_glyphs),
            private_dict: Some(dict_entry(&[500], &[20])),
            local_subrs: Vec::new(),
        }
    }
}

/// Build a CFF font set holding a single name-keyed font.
pub fn build_type1_cff(font: &TestFont) -> Vec<u8> {
    build_font_set(&font.strings, &font.global_subrs, std::slice::from_ref(font))
}

/// Build a CFF font set holding several name-keyed fonts.
///
/// The fonts share `strings` and `global_subrs`, their own `strings` and `global_subrs` are
/// ignored.
///
/// Layout: header, Name INDEX, Top DICT INDEX, String INDEX, Global Subr INDEX, then for each
/// font its CharStrings INDEX, Private DICT and Local Subr INDEX.
pub fn build_font_set(strings: &[&str], global_subrs: &[Vec<u8>], fonts: &[TestFont]) -> Vec<u8> {
    let header = [1u8, 0, 4, 4];
    let name_index = index(
        &fonts
            .iter()
            .map(|font| font.name.as_bytes())
            .collect::<Vec<_>>(),
    );
    let string_index = index(strings);
    let global_subr_index = index(global_subrs);

    let top_dict_lengths = fonts
        .iter()
        .map(|font| {
            let private_len = font.private_dict.as_ref().map_or(0, |_| 11);
            vec![0u8; font.top_dict.len() + 6 + private_len]
        })
        .collect::<Vec<_>>();
    let top_dict_index_len = index(&top_dict_lengths).len();
    let mut offset = header.len()
        + name_index.len()
        + top_dict_index_len
        + string_index.len()
        + global_subr_index.len();

    let mut top_dicts = Vec::new();
    let mut font_data = Vec::new();
    for font in fonts {
        let mut top_dict = font.top_dict.clone();
        let char_strings_index = index(&font.char_strings);
        top_dict.extend(offset_entry(&[offset], &[17]));
        offset += char_strings_index.len();
        font_data.extend(char_strings_index);

        if let Some(entries) = &font.private_dict {
            let has_subrs = !font.local_subrs.is_empty();
            let private = private_dict_bytes(entries, has_subrs);
            top_dict.extend(offset_entry(&[private.len(), offset], &[18]));
            offset += private.len();
            font_data.extend(private);
            if has_subrs {
                let local_subr_index = index(&font.local_subrs);
                offset += local_subr_index.len();
                font_data.extend(local_subr_index);
            }
        }
        top_dicts.push(top_dict);
    }

    let mut data = header.to_vec();
    data.extend(name_index);
    data.extend(index(&top_dicts));
    data.extend(string_index);
    data.extend(global_subr_index);
    data.extend(font_data);
    data
}

pub struct TestFontDict {
    pub font_name: Option<i32>,
    pub private_dict: Vec<u8>,
    pub local_subrs: Vec<Vec<u8>>,
}

/// A CID-keyed font with ROS Adobe-Identity-0.
pub struct TestCidFont {
    pub name: &'static str,
    /// Strings following "Adobe" (SID 391) and "Identity" (SID 392).
    pub strings: Vec<&'static str>,
    /// Entries written after ROS and CIDCount.
    pub top_dict: Vec<u8>,
    pub global_subrs: Vec<Vec<u8>>,
    pub char_strings: Vec<Vec<u8>>,
    /// Custom charset data, ISOAdobe is used when `None`.
    pub charset: Option<Vec<u8>>,
    pub fd_select: Vec<u8>,
    pub font_dicts: Vec<TestFontDict>,
}

impl TestCidFont {
    /// A font with a single Font DICT selected for all glyphs.
    pub fn new(name: &'static str, n_glyphs: usize) -> TestCidFont {
        TestCidFont {
            name,
            strings: Vec::new(),
            top_dict: Vec::new(),
            global_subrs: Vec::new(),
            char_strings: test_char_strings(n_glyphs),
            charset: None,
            fd_select: fd_select_format3(&[(0, 0)], n_glyphs as u16),
            font_dicts: vec![TestFontDict {
                font_name: None,
                private_dict: dict_entry(&[500], &[20]),
                local_subrs: Vec::new(),
            }],
        }
    }
}

/// Build a CFF font set holding a single CID-keyed font.
///
/// Layout: header, Name INDEX, Top DICT INDEX, String INDEX, Global Subr INDEX, charset,
/// FDSelect, FDArray, the Private DICT and Local Subr INDEX of each Font DICT, CharStrings INDEX.
pub fn build_cid_cff(font: &TestCidFont) -> Vec<u8> {
    let header = [1u8, 0, 4, 4];
    let name_index = index(&[font.name.as_bytes()]);
    let mut strings = vec!["Adobe", "Identity"];
    strings.extend(font.strings.iter().copied());
    let string_index = index(&strings);
    let global_subr_index = index(&font.global_subrs);
    let char_strings_index = index(&font.char_strings);

    let ros = dict_entry(&[391, 392, 0], &[12, 30]);
    let cid_count = dict_entry(&[font.char_strings.len() as i32], &[12, 34]);
    let top_dict_len = ros.len()
        + cid_count.len()
        + font.top_dict.len()
        + 7
        + 7
        + font.charset.as_ref().map_or(0, |_| 6)
        + 6;
    let top_dict_index_len = index(&[vec![0u8; top_dict_len]]).len();

    let mut offset = header.len()
        + name_index.len()
        + top_dict_index_len
        + string_index.len()
        + global_subr_index.len();
    let charset_offset = offset;
    offset += font.charset.as_ref().map_or(0, Vec::len);
    let fd_select_offset = offset;
    offset += font.fd_select.len();

    let font_name_entries = font
        .font_dicts
        .iter()
        .map(|font_dict| match font_dict.font_name {
            Some(sid) => dict_entry(&[sid], &[12, 38]),
            None => Vec::new(),
        })
        .collect::<Vec<_>>();
    let fd_array_len = index(
        &font_name_entries
            .iter()
            .map(|entry| vec![0u8; entry.len() + 11])
            .collect::<Vec<_>>(),
    )
    .len();
    let fd_array_offset = offset;
    offset += fd_array_len;

    let mut privates = Vec::new();
    let mut font_dicts = Vec::new();
    for (font_dict, font_name_entry) in font.font_dicts.iter().zip(font_name_entries) {
        let has_subrs = !font_dict.local_subrs.is_empty();
        let private = private_dict_bytes(&font_dict.private_dict, has_subrs);
        let mut dict = font_name_entry;
        dict.extend(offset_entry(&[private.len(), offset], &[18]));
        font_dicts.push(dict);

        offset += private.len();
        privates.extend(private);
        if has_subrs {
            let local_subr_index = index(&font_dict.local_subrs);
            offset += local_subr_index.len();
            privates.extend(local_subr_index);
        }
    }
    let char_strings_offset = offset;

    let mut top_dict = ros;
    top_dict.extend(cid_count);
    top_dict.extend_from_slice(&font.top_dict);
    top_dict.extend(offset_entry(&[fd_array_offset], &[12, 36]));
    top_dict.extend(offset_entry(&[fd_select_offset], &[12, 37]));
    if font.charset.is_some() {
        top_dict.extend(offset_entry(&[charset_offset], &[15]));
    }
    top_dict.extend(offset_entry(&[char_strings_offset], &[17]));

    let mut data = header.to_vec();
    data.extend(name_index);
    data.extend(index(&[top_dict]));
    data.extend(string_index);
    data.extend(global_subr_index);
    if let Some(charset) = &font.charset {
        data.extend_from_slice(charset);
    }
    data.extend_from_slice(&font.fd_select);
    data.extend(index(&font_dicts));
    data.extend(privates);
    data.extend(char_strings_index);
    data
}
