//! End-to-end packet receipt through `IcqHost` with a routed executor.
//!
//! Each case builds a packet, tweaks host params and checks whether the host
//! acknowledges it, mirroring how a channel integration drives the module.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use interchain_query::prelude::*;
use interchain_query::protocol::ack::ErrorDescriptor;
use interchain_query::error::ErrorKind;

const ALL_BALANCES: &str = "/cosmos.bank.v1beta1.Query/AllBalances";

/// Bank-like handler: the request body is an account name, the response lists
/// `count` coins and reading each one costs gas.
fn bank_router(count: usize) -> QueryRouter {
    let router = QueryRouter::new().with_gas_per_query(100);
    router
        .register(ALL_BALANCES, move |data, meter| {
            if data.is_empty() {
                return Err(ExecutionFailure::failed("empty address"));
            }
            let mut out = Vec::new();
            for i in 0..count {
                meter.consume_gas(30, "read balance")?;
                out.extend_from_slice(format!("{i}denom,").as_bytes());
            }
            Ok(out)
        })
        .unwrap();
    router
}

fn packet(requests: &[QueryRequest]) -> Vec<u8> {
    let data = serialize_query(requests).unwrap();
    InterchainQueryPacketData::new(data, "").to_bytes().unwrap()
}

fn host(router: QueryRouter, max_gas: u64) -> IcqHost<QueryRouter> {
    IcqHost::new(ParamStore::default(), router, max_gas)
}

fn allow_balances(host: &IcqHost<QueryRouter>) {
    host.param_store()
        .update(true, vec![ALL_BALANCES.to_string()])
        .unwrap();
}

struct Case {
    msg: &'static str,
    packet: Vec<u8>,
    set_params: bool,
    exp_pass: bool,
}

#[test]
fn test_on_recv_packet() {
    let cases = vec![
        Case {
            msg: "icq successfully queries AllBalances",
            packet: packet(&[QueryRequest::new(ALL_BALANCES, b"cosmos1sender".to_vec())]),
            set_params: true,
            exp_pass: true,
        },
        Case {
            msg: "cannot unmarshal interchain query packet data",
            packet: Vec::new(),
            set_params: true,
            exp_pass: false,
        },
        Case {
            msg: "cannot deserialize interchain query packet data messages",
            packet: InterchainQueryPacketData::new(b"invalid packet data".to_vec(), "")
                .to_bytes()
                .unwrap(),
            set_params: true,
            exp_pass: false,
        },
        Case {
            msg: "unauthorised: message type not allowed",
            packet: packet(&[QueryRequest::new(ALL_BALANCES, b"cosmos1sender".to_vec())]),
            set_params: false,
            exp_pass: false,
        },
        Case {
            msg: "unauthorised: can not perform historical query (i.e. height != 0)",
            packet: packet(&[
                QueryRequest::new(ALL_BALANCES, b"cosmos1sender".to_vec()).with_height(1)
            ]),
            set_params: true,
            exp_pass: false,
        },
        Case {
            msg: "unauthorised: can not fetch query proof (i.e. prove == true)",
            packet: packet(&[
                QueryRequest::new(ALL_BALANCES, b"cosmos1sender".to_vec()).with_prove(true)
            ]),
            set_params: true,
            exp_pass: false,
        },
        Case {
            msg: "query handler error fails the packet",
            packet: packet(&[QueryRequest::new(ALL_BALANCES, Vec::new())]),
            set_params: true,
            exp_pass: false,
        },
    ];

    for case in cases {
        let host = host(bank_router(3), 100_000);
        if case.set_params {
            allow_balances(&host);
        }

        let outcome = host.on_recv_packet(&case.packet);

        if case.exp_pass {
            assert!(outcome.is_acknowledged(), "{}: {outcome:?}", case.msg);
        } else {
            assert!(outcome.is_rejected(), "{}: {outcome:?}", case.msg);
        }
    }
}

#[test]
fn test_out_of_gas_on_slow_queries() {
    let request = packet(&[QueryRequest::new(ALL_BALANCES, b"cosmos1sender".to_vec())]);

    // enough gas for the small account
    let small = host(bank_router(10), 2_000);
    allow_balances(&small);
    assert!(small.on_recv_packet(&request).is_acknowledged());

    // the same query against a huge account must abort, not acknowledge
    let large = host(bank_router(150_000), 2_000);
    allow_balances(&large);
    let outcome = large.on_recv_packet(&request);
    assert!(outcome.is_aborted(), "expected abort, got {outcome:?}");
    assert!(Acknowledgement::from_outcome(&outcome).unwrap().is_none());
}

#[test]
fn test_acknowledgement_carries_ordered_results() {
    let router = QueryRouter::new().with_gas_per_query(0);
    router
        .register("/svc/Echo", |data, _| Ok(data.to_vec()))
        .unwrap();
    let host = IcqHost::new(
        ParamStore::new(HostParams::new(true, ["/svc/Echo"])).unwrap(),
        router,
        10_000,
    );

    let outcome = host.on_recv_packet(&packet(&[
        QueryRequest::new("/svc/Echo", b"first".to_vec()),
        QueryRequest::new("/svc/Echo", b"second".to_vec()),
    ]));

    let ack = Acknowledgement::from_outcome(&outcome).unwrap().unwrap();
    assert!(ack.success());

    let bytes = ack.to_bytes().unwrap();
    let Acknowledgement::Result(inner) = Acknowledgement::from_bytes(&bytes).unwrap() else {
        panic!("expected result acknowledgement");
    };
    let packet_ack = InterchainQueryPacketAck::from_bytes(&inner).unwrap();
    let values: Vec<Vec<u8>> = deserialize_response(&packet_ack.data)
        .unwrap()
        .into_iter()
        .map(|r| r.value)
        .collect();
    assert_eq!(values, vec![b"first".to_vec(), b"second".to_vec()]);
}

#[test]
fn test_large_result_is_acknowledged() {
    let router = QueryRouter::new().with_gas_per_query(0);
    router
        .register("/svc/Dump", |_, _| Ok(vec![7u8; 2 * 1024 * 1024]))
        .unwrap();
    let host = IcqHost::new(
        ParamStore::new(HostParams::new(true, ["/svc/Dump"])).unwrap(),
        router,
        10_000,
    );

    let outcome = host.on_recv_packet(&packet(&[QueryRequest::new("/svc/Dump", Vec::new())]));
    let ack = match outcome {
        PacketOutcome::Acknowledged(ack) => ack,
        other => panic!("expected acknowledgement, got {other:?}"),
    };
    assert!(ack.data.len() > 2 * 1024 * 1024);
    assert!(ack.data.ends_with(&[7u8; 64]));

    let written = Acknowledgement::from_outcome(&PacketOutcome::Acknowledged(ack)).unwrap();
    assert!(written.is_some_and(|ack| ack.success()));
}

#[test]
fn test_error_acknowledgement_descriptor() {
    let host = host(bank_router(1), 10_000);
    let outcome = host.on_recv_packet(&packet(&[QueryRequest::new(
        ALL_BALANCES,
        b"cosmos1sender".to_vec(),
    )]));

    match Acknowledgement::from_outcome(&outcome).unwrap() {
        Some(Acknowledgement::Error(ErrorDescriptor { kind, message })) => {
            assert_eq!(kind, ErrorKind::Unauthorized);
            assert!(message.contains(ALL_BALANCES));
        }
        other => panic!("expected error acknowledgement, got {other:?}"),
    }
}

#[test]
fn test_host_from_config() {
    let config = HostConfig::default_with_overrides(|c| {
        c.params = HostParams::new(true, [ALL_BALANCES]);
        c.gas.max_gas_per_packet = 50_000;
    });
    let host = IcqHost::from_config(&config, bank_router(2)).unwrap();
    assert_eq!(host.max_gas_per_packet(), 50_000);

    let outcome = host.on_recv_packet(&packet(&[QueryRequest::new(
        ALL_BALANCES,
        b"cosmos1sender".to_vec(),
    )]));
    assert!(outcome.is_acknowledged());
}

#[test]
fn test_host_from_invalid_config_fails() {
    let config = HostConfig::default_with_overrides(|c| {
        c.params = HostParams::new(true, [ALL_BALANCES, ALL_BALANCES]);
    });
    assert!(IcqHost::from_config(&config, bank_router(1)).is_err());
}
