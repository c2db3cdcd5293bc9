//! Builders for synthetic `.dat` byte streams, shared by the
//! unit tests.

/// Lays out a complete U-View file in memory
pub struct SyntheticFile {
    width : u16,
    height : u16,
    recipe : Vec<u8>,
    ticks : u64,
    custom_block : bool,
    records : Vec<u8>,
    pixels : Vec<u16>,
}

impl SyntheticFile {
    /// An image of the requested size with pixels `0, 1, 2, ...`
    /// (row-major, as stored) and an empty standard metadata block.
    pub fn new(width : u16, height : u16) -> Self {
        SyntheticFile {
            width,
            height,
            recipe : Vec::new(),
            ticks : 0,
            custom_block : false,
            records : vec![255],
            pixels : (0..(width as u32 * height as u32)).map(|x| x as u16).collect(),
        }
    }

    pub fn recipe(mut self, recipe : Vec<u8>) -> Self {
        self.recipe = recipe;
        self
    }

    pub fn timestamp_ticks(mut self, ticks : u64) -> Self {
        self.ticks = ticks;
        self
    }

    /// Raw record bytes for the standard 256 byte block,
    /// zero padded.
    pub fn records(mut self, records : Vec<u8>) -> Self {
        assert!(records.len() <= 256);
        self.records = records;
        self.custom_block = false;
        self
    }

    /// Record bytes stored as a custom-length block
    pub fn custom_records(mut self, records : Vec<u8>) -> Self {
        assert!(records.len() != 2);
        self.records = records;
        self.custom_block = true;
        self
    }

    /// Pixel payload in file order (before the vertical flip)
    pub fn pixels(mut self, pixels : Vec<u16>) -> Self {
        self.pixels = pixels;
        self
    }

    fn metadata_block_version(&self) -> u16 {
        if self.custom_block { self.records.len() as u16 } else { 2 }
    }

    pub fn header_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut id = b"UKSOFT2001".to_vec();
        id.resize(20, 0);
        out.extend(id);
        out.extend(104i16.to_le_bytes());
        out.extend(2i16.to_le_bytes());
        out.extend(16i16.to_le_bytes());
        out.extend([0u8; 14]);
        out.extend(self.width.to_le_bytes());
        out.extend(self.height.to_le_bytes());
        out.extend(1i16.to_le_bytes());
        out.extend((self.recipe.len() as i16).to_le_bytes());
        out.extend([0u8; 56]);
        if !self.recipe.is_empty() {
            let mut recipe = self.recipe.clone();
            recipe.resize(128, 0);
            out.extend(recipe);
        }
        out.extend(288i16.to_le_bytes());
        out.extend(5i16.to_le_bytes());
        out.extend(10i16.to_le_bytes());
        out.extend(4000i16.to_le_bytes());
        out.extend(self.ticks.to_le_bytes());
        out.extend((-3i16).to_le_bytes());
        out.extend(4i16.to_le_bytes());
        out.push(1);
        out.push(0);
        out.extend(0i16.to_le_bytes());
        out.extend(7i16.to_le_bytes());
        out.extend(self.metadata_block_version().to_le_bytes());
        out
    }

    pub fn metadata_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if self.custom_block {
            out.extend([0u8; 388]);
            out.extend(&self.records);
        } else {
            let mut block = self.records.clone();
            block.resize(256, 0);
            out.extend(block);
        }
        out
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = self.header_bytes();
        out.extend(self.metadata_bytes());
        self.pixels.iter().for_each(|px| out.extend(px.to_le_bytes()));
        out
    }
}

/// `tag, name, unit digit, \0, f32`
pub fn standard_record(tag : u8, name : &str, unit_digit : u8, value : f32) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(name.as_bytes());
    out.push(unit_digit);
    out.push(0);
    out.extend(value.to_le_bytes());
    out
}

/// `110, text (cp1252), \0, f32`
pub fn fov_record(text : &[u8], calibration : f32) -> Vec<u8> {
    let mut out = vec![110];
    out.extend(text);
    out.push(0);
    out.extend(calibration.to_le_bytes());
    out
}

/// `tag, name, \0, unit, \0, f32`
pub fn gauge_record(tag : u8, name : &str, unit : &str, value : f32) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(name.as_bytes());
    out.push(0);
    out.extend(unit.as_bytes());
    out.push(0);
    out.extend(value.to_le_bytes());
    out
}

/// `104, f32 seconds, averaging byte, spare byte`
pub fn exposure_record(seconds : f32, averaging : u8) -> Vec<u8> {
    let mut out = vec![104];
    out.extend(seconds.to_le_bytes());
    out.push(averaging);
    out.push(0);
    out
}
