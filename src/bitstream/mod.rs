//! The bitstream module forms the I/O subsystem for huff.
//!
//! Archives are bit-packed, most significant bit first, with no byte alignment between the
//! header and the body. BitReader pulls bits (or short runs of bits) from any reader and can
//! rewind seekable sources. BitWriter packs bits into bytes and zero pads the final byte.
//!
pub mod bitreader;
pub mod bitwriter;
