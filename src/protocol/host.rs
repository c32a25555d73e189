//! # Packet Orchestrator
//!
//! Receives an interchain query packet and runs it through
//! `decode -> authorize -> execute -> encode`.
//!
//! ## Outcomes
//! - [`PacketOutcome::Acknowledged`]: every query succeeded; carries the
//!   response batch in request order.
//! - [`PacketOutcome::Rejected`]: decoding, authorization or execution failed.
//!   The batch is all-or-nothing, so a single bad query rejects the packet and
//!   no partial results are ever returned.
//! - [`PacketOutcome::Aborted`]: the packet's gas budget ran out. The caller
//!   must discard every side effect of the enclosing transaction and write no
//!   acknowledgement.
//!
//! The orchestrator keeps no state between packets. Policy is passed in as a
//! snapshot, and a fresh [`GasMeter`] is created per packet.

use crate::config::{HostConfig, HOST_PORT_ID};
use crate::core::packet::{InterchainQueryPacketAck, InterchainQueryPacketData};
use crate::core::query::{serialize_response, QueryRequest, QueryResponse};
use crate::error::{constants, IcqError, OutOfGas, Result};
use crate::protocol::executor::{ExecutionFailure, QueryExecutor};
use crate::protocol::gas::GasMeter;
use crate::protocol::params::{HostParams, ParamStore};
use crate::utils::metrics::{global_metrics, Timer};
use tracing::{debug, instrument, warn};

/// Result of processing one packet
#[derive(Debug)]
pub enum PacketOutcome {
    /// All queries executed; the ack data holds the encoded responses
    Acknowledged(InterchainQueryPacketAck),
    /// Recoverable protocol-level failure; write an error acknowledgement
    Rejected(IcqError),
    /// Gas exhausted; roll back and write nothing
    Aborted(OutOfGas),
}

impl PacketOutcome {
    #[inline]
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, PacketOutcome::Acknowledged(_))
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        matches!(self, PacketOutcome::Rejected(_))
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self, PacketOutcome::Aborted(_))
    }

    /// The rejection error, if any
    pub fn error(&self) -> Option<&IcqError> {
        match self {
            PacketOutcome::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// Process one packet against a policy snapshot.
///
/// `gas_limit` bounds the total gas of the whole batch.
#[instrument(skip(packet, params, executor), fields(port = HOST_PORT_ID, packet_len = packet.len()))]
pub fn process_packet<E>(
    packet: &[u8],
    params: &HostParams,
    executor: &E,
    gas_limit: u64,
) -> PacketOutcome
where
    E: QueryExecutor + ?Sized,
{
    let _timer = Timer::start("process_packet");
    let metrics = global_metrics();
    metrics.packet_received(packet.len() as u64);

    let requests = match decode_requests(packet) {
        Ok(requests) => requests,
        Err(err) => {
            debug!(error = %err, "Rejecting undecodable packet");
            return reject(err);
        }
    };

    if let Err(err) = authenticate_queries(params, &requests) {
        debug!(error = %err, queries = requests.len(), "Rejecting unauthorized batch");
        return reject(err);
    }

    let mut meter = GasMeter::new(gas_limit);
    let responses = match execute_queries(executor, &requests, &mut meter) {
        Ok(responses) => responses,
        Err(Halt::Rejected(err)) => {
            debug!(error = %err, gas_consumed = meter.gas_consumed(), "Query execution failed");
            metrics.gas_consumed(meter.gas_consumed_to_limit());
            return reject(err);
        }
        Err(Halt::Aborted(out_of_gas)) => {
            warn!(
                error = %out_of_gas,
                gas_limit,
                "Gas exhausted, aborting packet without acknowledgement"
            );
            metrics.gas_consumed(meter.gas_consumed_to_limit());
            metrics.packet_aborted();
            return PacketOutcome::Aborted(out_of_gas);
        }
    };

    metrics.gas_consumed(meter.gas_consumed());

    match serialize_response(&responses) {
        Ok(data) => {
            debug!(
                queries = responses.len(),
                gas_consumed = meter.gas_consumed(),
                "Interchain query batch executed"
            );
            metrics.packet_acknowledged();
            PacketOutcome::Acknowledged(InterchainQueryPacketAck::new(data))
        }
        Err(err) => reject(err),
    }
}

/// Decode the envelope and its request batch.
fn decode_requests(packet: &[u8]) -> Result<Vec<QueryRequest>> {
    InterchainQueryPacketData::from_bytes(packet)?.requests()
}

/// All-or-nothing authorization: the first refused request rejects the batch.
fn authenticate_queries(params: &HostParams, requests: &[QueryRequest]) -> Result<()> {
    requests.iter().try_for_each(|request| params.authorize(request))
}

enum Halt {
    Rejected(IcqError),
    Aborted(OutOfGas),
}

/// Execute the batch in order on a shared meter.
fn execute_queries<E>(
    executor: &E,
    requests: &[QueryRequest],
    meter: &mut GasMeter,
) -> std::result::Result<Vec<QueryResponse>, Halt>
where
    E: QueryExecutor + ?Sized,
{
    let metrics = global_metrics();
    let mut responses = Vec::with_capacity(requests.len());

    for (index, request) in requests.iter().enumerate() {
        let result = executor.execute(request, meter);

        // An overrun meter is exhaustion whatever the executor reported,
        // including a charge error it swallowed or rewrapped as a failure.
        if meter.is_out_of_gas() {
            return Err(Halt::Aborted(match result {
                Err(ExecutionFailure::OutOfGas(out_of_gas)) => out_of_gas,
                _ => OutOfGas {
                    descriptor: request.path.clone(),
                    limit: meter.limit(),
                    used: meter.gas_consumed(),
                },
            }));
        }

        let response = match result {
            Ok(response) => response,
            Err(ExecutionFailure::OutOfGas(out_of_gas)) => return Err(Halt::Aborted(out_of_gas)),
            Err(ExecutionFailure::Failed(message)) => {
                return Err(Halt::Rejected(IcqError::Execution(format!(
                    "query {index} ({}) failed: {message}",
                    request.path
                ))))
            }
        };

        if !response.is_ok() {
            return Err(Halt::Rejected(IcqError::Execution(format!(
                "query {index} ({}) {} {}: {}",
                request.path,
                constants::ERR_NON_ZERO_CODE,
                response.code,
                response.log
            ))));
        }

        metrics.query_executed();
        responses.push(response);
    }

    Ok(responses)
}

#[inline]
fn reject(err: IcqError) -> PacketOutcome {
    global_metrics().packet_rejected(err.kind());
    PacketOutcome::Rejected(err)
}

/// Host side of the interchain query module.
///
/// Owns a handle to the persisted params, the query executor and the per-packet
/// gas limit. Params are snapshotted at the start of every packet.
pub struct IcqHost<E> {
    params: ParamStore,
    executor: E,
    max_gas_per_packet: u64,
}

impl<E: QueryExecutor> IcqHost<E> {
    pub fn new(params: ParamStore, executor: E, max_gas_per_packet: u64) -> Self {
        Self {
            params,
            executor,
            max_gas_per_packet,
        }
    }

    /// Build a host from a validated configuration
    pub fn from_config(config: &HostConfig, executor: E) -> Result<Self> {
        config.validate_strict()?;
        let params = ParamStore::new(config.params.clone())?;
        Ok(Self::new(params, executor, config.gas.max_gas_per_packet))
    }

    /// Handle to the params; clones share state with the host
    pub fn param_store(&self) -> &ParamStore {
        &self.params
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn max_gas_per_packet(&self) -> u64 {
        self.max_gas_per_packet
    }

    /// Process a received packet
    pub fn on_recv_packet(&self, packet: &[u8]) -> PacketOutcome {
        let params = match self.params.params() {
            Ok(params) => params,
            Err(err) => return reject(err),
        };
        process_packet(packet, &params, &self.executor, self.max_gas_per_packet)
    }
}
