// SPDX-License-Identifier: Apache-2.0

#![no_main]

use libfuzzer_sys::fuzz_target;

use cordon_core::{BoundedBuffer, CommandParser, InputSource, UnknownPrefix};

fuzz_target!(|data: &[u8]| {
    let buffer = BoundedBuffer::new(1024);
    if let Ok(raw) = buffer.ingest(data, InputSource::Socket) {
        let _ = CommandParser::new(UnknownPrefix::Reject).parse(&raw);
        let _ = CommandParser::new(UnknownPrefix::EchoFallback).parse(&raw);
    }
    let _ = buffer.ingest_lossy(data, InputSource::Socket);
});
