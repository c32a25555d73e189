use interchain_query::prelude::*;

#[test]
#[allow(clippy::unwrap_used)]
fn stress_large_batches() {
    // Heavy bursts of wide batches, ensure ordering holds and nothing panics
    let router = QueryRouter::new().with_gas_per_query(10);
    router.register("/svc/Echo", |data, _| Ok(data.to_vec())).unwrap();
    let params = HostParams::new(true, ["/svc/Echo"]);

    for width in [1usize, 16, 256, 2048] {
        let requests: Vec<QueryRequest> = (0..width)
            .map(|i| QueryRequest::new("/svc/Echo", (i as u32).to_le_bytes().to_vec()))
            .collect();
        let data = serialize_query(&requests).unwrap();
        let packet = InterchainQueryPacketData::new(data, "").to_bytes().unwrap();

        for _ in 0..50 {
            let outcome = process_packet(&packet, &params, &router, 1_000_000);
            let PacketOutcome::Acknowledged(ack) = outcome else {
                panic!("batch of {width} should be acknowledged");
            };
            let responses = deserialize_response(&ack.data).unwrap();
            assert_eq!(responses.len(), width);
            assert_eq!(responses[width - 1].value, ((width - 1) as u32).to_le_bytes());
        }
    }
}
