//! Criterion benchmarks for the receive hot path.
//!
//! Every line from the daemon goes through framing, parsing and the press
//! state machine before anything is injected, so these three steps bound the
//! added input latency.
//!
//! Run with:
//! ```bash
//! cargo bench --package irbridge-core --bench protocol_bench
//! ```

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use irbridge_core::{
    parse_line, KeyBinding, KeyCode, KeyMappingTable, LineBuffer, PressStateMachine,
};

const LINE: &str = "000000037ff07bee 0a VOL_UP samsung-tv";

fn bench_parse_line(c: &mut Criterion) {
    c.bench_function("parse_line", |b| b.iter(|| parse_line(black_box(LINE))));
}

fn bench_framing(c: &mut Criterion) {
    let chunk: Vec<u8> = std::iter::repeat(format!("{LINE}\n"))
        .take(16)
        .collect::<String>()
        .into_bytes();

    c.bench_function("line_buffer_16_lines", |b| {
        b.iter(|| {
            let mut buf = LineBuffer::new();
            buf.extend(black_box(&chunk)).unwrap();
            let mut n = 0;
            while buf.next_line().is_some() {
                n += 1;
            }
            n
        })
    });
}

fn bench_state_machine(c: &mut Criterion) {
    let table: KeyMappingTable = [("VOL_UP".to_string(), KeyBinding::plain(KeyCode(0xAF)))]
        .into_iter()
        .collect();
    let event = parse_line(LINE).unwrap();
    let now = Instant::now();
    let mut machine = PressStateMachine::new(Duration::from_millis(150), 3, now);

    c.bench_function("press_state_machine_repeat", |b| {
        b.iter(|| machine.on_event(black_box(&event), &table, now))
    });
}

criterion_group!(benches, bench_parse_line, bench_framing, bench_state_machine);
criterion_main!(benches);
