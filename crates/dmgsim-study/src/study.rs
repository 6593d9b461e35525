//! Study preparation.
//!
//! A [`Study`] fixes everything a schedule engine needs before any timeslot
//! is placed: the MCS, the frame aggregation, the BFT allocation counts of
//! every beacon interval and all durations.

use crate::bft::bft_allocations;
use crate::duration::DurationSet;
use crate::error::StudyError;
use crate::params::StudyParams;
use dmgsim_phy::constants::{MAX_A_MSDU_LENGTH, SIFS_NS};
use dmgsim_phy::{
    a_mpdu_length, a_msdu_length, data_mpdu_length, max_a_mpdu_subframes, select_mcs, BerTable,
    Mcs, McsTable,
};
use dmgsim_timeslot::Nanos;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Frame aggregation of one study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    /// MSDUs per A-MSDU (1 without aggregation).
    pub a_msdu_subframes: u64,
    /// A-MSDU length in octets.
    pub a_msdu_length: u64,
    /// MPDU length in octets.
    pub mpdu_length: u64,
    /// MPDUs per A-MPDU (1 without aggregation).
    pub a_mpdu_subframes: u64,
    /// PSDU length in octets.
    pub psdu_length: u64,
}

impl Aggregation {
    /// Aggregate MSDUs of `msdu_length` octets as far as the flags allow.
    pub fn new(
        msdu_length: u64,
        msdu_aggregation: bool,
        mpdu_aggregation: bool,
        mcs: &Mcs,
    ) -> Result<Self, StudyError> {
        let a_msdu_subframes = if msdu_aggregation {
            MAX_A_MSDU_LENGTH / msdu_length
        } else {
            1
        };
        let a_msdu_length = a_msdu_length(a_msdu_subframes, msdu_length)?;
        let mpdu_length = data_mpdu_length(a_msdu_length, None);

        let a_mpdu_subframes = if mpdu_aggregation {
            max_a_mpdu_subframes(mcs, mpdu_length)
        } else {
            1
        };
        if a_mpdu_subframes == 0 {
            return Err(StudyError::InvalidParams(format!(
                "MPDU of {} octets does not fit a PPDU at MCS {}",
                mpdu_length, mcs.mcs
            )));
        }
        let psdu_length = a_mpdu_length(a_mpdu_subframes, mpdu_length);

        Ok(Self {
            a_msdu_subframes,
            a_msdu_length,
            mpdu_length,
            a_mpdu_subframes,
            psdu_length,
        })
    }

    /// MSDUs carried by one PSDU.
    pub fn msdus_per_psdu(&self) -> u64 {
        self.a_msdu_subframes * self.a_mpdu_subframes
    }
}

/// A prepared study, ready to be scheduled.
#[derive(Debug, Clone)]
pub struct Study {
    params: StudyParams,
    mcs: Mcs,
    aggregation: Aggregation,
    durations: DurationSet,
    bft_period: Nanos,
    bft_allocations: Vec<u64>,
    data_allocations: Vec<u64>,
}

impl Study {
    /// Prepare a study from its parameters and the lookup tables.
    ///
    /// Fails with [`PhyError::ConstraintUnsatisfiable`](dmgsim_phy::PhyError)
    /// when no MCS meets the BER requirement.
    pub fn prepare(
        params: StudyParams,
        mcs_table: &McsTable,
        ber_table: &BerTable,
    ) -> Result<Self, StudyError> {
        params.validate()?;

        let mcs = *mcs_table.get(select_mcs(params.eb_n0, params.max_ber, ber_table)?)?;

        let mut durations = DurationSet::new();
        durations.generate_bft(&params.beamforming())?;

        let bft_period = params
            .mobility
            .bft_period(params.initiator_sectors, params.horizon());
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let bft_allocations = bft_allocations(
            params.observed_bi,
            params.bi_duration_ns,
            bft_period,
            params.num_users,
            &mut rng,
        )?;
        // Data SPs are the gaps around the BFT SPs
        let data_allocations: Vec<u64> = bft_allocations.iter().map(|n| n + 1).collect();

        let aggregation = Aggregation::new(
            params.msdu_length_bytes,
            params.msdu_aggregation,
            params.mpdu_aggregation,
            &mcs,
        )?;

        durations.generate_ack(aggregation.a_mpdu_subframes)?;
        durations.generate_cts()?;
        durations.generate_data_ppdu(aggregation.psdu_length, &mcs)?;
        durations.generate_data_with_overhead(params.self_cts, params.ack)?;
        durations.generate_guard_time(params.bi_duration_ns)?;
        for count in data_allocations.iter().copied().collect::<BTreeSet<_>>() {
            durations.generate_bti(count)?;
        }

        debug!(
            mcs = %mcs.mcs,
            bft_period,
            ?bft_allocations,
            psdu_length = aggregation.psdu_length,
            msdus_per_psdu = aggregation.msdus_per_psdu(),
            "Prepared study"
        );

        Ok(Self {
            params,
            mcs,
            aggregation,
            durations,
            bft_period,
            bft_allocations,
            data_allocations,
        })
    }

    pub fn params(&self) -> &StudyParams {
        &self.params
    }

    pub fn mcs(&self) -> &Mcs {
        &self.mcs
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    pub fn durations(&self) -> &DurationSet {
        &self.durations
    }

    /// Beamforming period in ns.
    pub fn bft_period(&self) -> Nanos {
        self.bft_period
    }

    /// BFT SPs in each observed beacon interval.
    pub fn bft_allocations(&self) -> &[u64] {
        &self.bft_allocations
    }

    /// Data SPs in each observed beacon interval.
    pub fn data_allocations(&self) -> &[u64] {
        &self.data_allocations
    }

    /// Observed time in ns.
    pub fn horizon(&self) -> Nanos {
        self.params.horizon()
    }

    /// Time from the start of a data exchange to the start of its data PPDU
    /// plus the PPDU itself.
    pub fn generation_offset(&self) -> Result<f64, StudyError> {
        let mut offset = self.durations.data_ppdu()?;
        if self.params.self_cts {
            offset += self.durations.cts()? + SIFS_NS;
        }
        Ok(offset as f64)
    }
}
