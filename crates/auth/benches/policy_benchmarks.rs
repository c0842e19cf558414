use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use salonbook_auth::{AccessRequest, AdminAllowList, Caller, PolicyDirectory, PolicyEvaluator, PublicSurface};
use salonbook_core::{DocumentId, Identity, SalonId};
use salonbook_records::Collection;

/// Directory with `n` salons, each with one member.
struct MapDirectory {
    members: HashMap<Identity, SalonId>,
}

impl MapDirectory {
    fn with_salons(n: usize) -> Self {
        let members = (0..n)
            .map(|i| {
                (
                    Identity::parse(format!("member-{i}")).unwrap(),
                    SalonId::parse(format!("owner-{i}")).unwrap(),
                )
            })
            .collect();
        Self { members }
    }
}

impl PolicyDirectory for MapDirectory {
    fn team_member_salon(&self, identity: &Identity) -> Option<SalonId> {
        self.members.get(identity).cloned()
    }

    fn salon_owner(&self, _salon_id: &SalonId) -> Option<Identity> {
        None
    }
}

fn bench_scoped_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoped_reads");

    for salons in [10, 1_000, 100_000].iter() {
        let evaluator = PolicyEvaluator::new(
            MapDirectory::with_salons(*salons),
            AdminAllowList::from_csv("ops@salonbook.app"),
            PublicSurface::closed(),
        );
        let body = json!({ "salonId": "owner-7", "name": "Ana", "email": "ana@example.com" });
        let request = AccessRequest::read(Collection::Clients, DocumentId::parse("c1").unwrap(), Some(&body));
        let member = Caller::new(Identity::parse("member-7").unwrap(), None);
        let stranger = Caller::new(Identity::parse("stranger").unwrap(), None);

        group.bench_with_input(BenchmarkId::new("member_allowed", salons), salons, |b, _| {
            b.iter(|| black_box(evaluator.authorize(Some(&member), &request).is_ok()))
        });
        group.bench_with_input(BenchmarkId::new("stranger_denied", salons), salons, |b, _| {
            b.iter(|| black_box(evaluator.authorize(Some(&stranger), &request).is_err()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scoped_reads);
criterion_main!(benches);
