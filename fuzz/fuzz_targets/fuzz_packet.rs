#![no_main]

use interchain_query::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary channel bytes must never panic the host
    let router = QueryRouter::new().with_gas_per_query(1);
    let _ = router.register("/svc/Echo", |body, _| Ok(body.to_vec()));
    let params = HostParams::new(true, ["/svc/Echo"]);

    let outcome = process_packet(data, &params, &router, 10_000);
    let _ = Acknowledgement::from_outcome(&outcome);
});
