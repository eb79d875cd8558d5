//! Shared test helper: builds FIT files byte by byte so decoder and
//! conversion tests can run against fully synthetic inputs.

#![allow(dead_code)]

/// FIT invalid-value sentinel for sint32 fields
pub const INVALID_SINT32: i32 = 0x7FFF_FFFF;
/// FIT invalid-value sentinel for uint16 fields
pub const INVALID_UINT16: u16 = 0xFFFF;

/// Builds a FIT file: 12-byte header, definition/data messages, trailing CRC
#[derive(Default)]
pub struct FitBuilder {
    body: Vec<u8>,
}

impl FitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a little-endian definition message for `global` with the given
    /// (field number, size, base type) triples
    pub fn define(&mut self, local: u8, global: u16, fields: &[(u8, u8, u8)]) -> &mut Self {
        self.body.push(0x40 | (local & 0x0F));
        self.body.push(0); // reserved
        self.body.push(0); // little-endian architecture
        self.body.extend_from_slice(&global.to_le_bytes());
        self.body.push(fields.len() as u8);
        for (num, size, base_type) in fields {
            self.body.push(*num);
            self.body.push(*size);
            self.body.push(*base_type);
        }
        self
    }

    /// Append a data message header plus raw payload bytes
    pub fn data(&mut self, local: u8, payload: &[u8]) -> &mut Self {
        self.body.push(local & 0x0F);
        self.body.extend_from_slice(payload);
        self
    }

    /// Append a compressed-timestamp data message (5-bit time offset)
    pub fn compressed_data(&mut self, local: u8, offset: u8, payload: &[u8]) -> &mut Self {
        self.body.push(0x80 | ((local & 0x03) << 5) | (offset & 0x1F));
        self.body.extend_from_slice(payload);
        self
    }

    /// Definition for a session message carrying only the sport field
    pub fn define_session(&mut self, local: u8) -> &mut Self {
        self.define(local, 18, &[(5, 1, 0x00)])
    }

    pub fn session(&mut self, local: u8, sport: u8) -> &mut Self {
        self.data(local, &[sport])
    }

    /// Definition for a record message: timestamp, position, altitude
    pub fn define_record(&mut self, local: u8) -> &mut Self {
        self.define(
            local,
            20,
            &[
                (253, 4, 0x86), // timestamp, uint32
                (0, 4, 0x85),   // position_lat, sint32
                (1, 4, 0x85),   // position_long, sint32
                (2, 2, 0x84),   // altitude, uint16
            ],
        )
    }

    /// Data message matching [`FitBuilder::define_record`].
    ///
    /// `altitude_raw` is pre-scaled: meters = raw / 5 - 500.
    pub fn record(
        &mut self,
        local: u8,
        timestamp: u32,
        lat: i32,
        lon: i32,
        altitude_raw: u16,
    ) -> &mut Self {
        let mut payload = Vec::new();
        payload.extend_from_slice(&timestamp.to_le_bytes());
        payload.extend_from_slice(&lat.to_le_bytes());
        payload.extend_from_slice(&lon.to_le_bytes());
        payload.extend_from_slice(&altitude_raw.to_le_bytes());
        self.data(local, &payload)
    }

    /// Direct access to the message body for hand-built test cases
    pub fn body_mut(&mut self) -> &mut Vec<u8> {
        &mut self.body
    }

    pub fn build(&self) -> Vec<u8> {
        let mut file = Vec::with_capacity(self.body.len() + 14);
        file.push(12); // header size
        file.push(0x10); // protocol version
        file.extend_from_slice(&2132u16.to_le_bytes()); // profile version
        file.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        file.extend_from_slice(b".FIT");
        file.extend_from_slice(&self.body);
        file.extend_from_slice(&[0, 0]); // CRC, not validated
        file
    }
}

/// Altitude raw value for a given elevation in meters (scale 5, offset 500)
pub fn altitude_raw(meters: f64) -> u16 {
    ((meters + 500.0) * 5.0) as u16
}
