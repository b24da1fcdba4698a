// Envelope benchmark - full vs. delta encoding of a large value with a
// small pending change, plus version reconciliation throughput.

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};

use stamped::codec::{DataInput, DataOutput, Delta, DeltaEnvelope, Serializable, TypeTag, Value};
use stamped::entry::factory::{EntryFactory, RegionFlags};
use stamped::entry::stamp::{DistributedSystemId, MemberId, Origin, VersionStamp};
use stamped::entry::MapEntry;
use stamped::{CodecConfig, CodecError};

// =============================================================================
// Benchmark value
// =============================================================================

/// A vector of readings where only the last slot changes.
#[derive(Clone)]
struct Series {
    readings: Vec<u64>,
    dirty: bool,
}

impl Serializable for Series {
    fn type_tag(&self) -> TypeTag {
        return TypeTag::User(1);
    }

    fn to_data(&self, output: &mut DataOutput) -> Result<(), CodecError> {
        output.write_u32(self.readings.len() as u32);
        for r in &self.readings {
            output.write_u64(*r);
        }
        return Ok(());
    }

    fn from_data(&mut self, input: &mut DataInput<'_>) -> Result<(), CodecError> {
        let len = input.read_u32()? as usize;
        self.readings = (0..len).map(|_| input.read_u64()).collect::<Result<_, _>>()?;
        return Ok(());
    }
}

impl Delta for Series {
    fn has_delta(&self) -> bool {
        return self.dirty;
    }

    fn to_delta(&self, output: &mut DataOutput) -> Result<(), CodecError> {
        output.write_u64(self.readings.last().copied().unwrap_or(0));
        return Ok(());
    }

    fn from_delta(&mut self, input: &mut DataInput<'_>) -> Result<(), CodecError> {
        let last = input.read_u64()?;
        if let Some(slot) = self.readings.last_mut() {
            *slot = last;
        }
        return Ok(());
    }

    fn clone_value(&self) -> Value {
        return Value::delta(self.clone());
    }
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for len in [16usize, 1024, 16 * 1024] {
        let value = Value::delta(Series { readings: (0..len as u64).collect(), dirty: true });
        group.throughput(Throughput::Elements(1));

        for (name, want_delta) in [("full", false), ("delta", true)] {
            group.bench_with_input(BenchmarkId::new(name, len), &value, |b, value| {
                let mut envelope = DeltaEnvelope::new(value, false, CodecConfig::default()).unwrap();
                b.iter(|| {
                    let mut out = DataOutput::new();
                    envelope.encode(black_box(value), want_delta, &mut out).unwrap();
                    black_box(out.len())
                });
            });
        }
    }

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let flags = RegionFlags { concurrency_checks_enabled: true, lru_tracking_enabled: false };
    let entry: MapEntry<u64, u64> = EntryFactory::new(flags).new_entry(0).unwrap();
    let origin = Origin::new(DistributedSystemId(1), MemberId(1));
    let stamps: Vec<VersionStamp> = (0..1024u64)
        .map(|i| VersionStamp::new(i * 7 % 1024, origin, i))
        .collect();

    c.bench_function("reconcile_1024", |b| {
        b.iter(|| {
            for s in &stamps {
                black_box(entry.reconcile(s));
            }
        });
    });
}

criterion_group!(benches, bench_encode, bench_reconcile);
criterion_main!(benches);
