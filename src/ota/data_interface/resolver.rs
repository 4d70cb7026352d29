use crate::ota::{
    config::Config,
    encoding::FileContext,
    error::{ConfigError, DecodeError, OtaError, TransportError},
};

use super::{DataInterface, FileBlock, Protocol, ProtocolPriority, PRIMARY_DATA_PROTOCOL};

/// The data transports compiled into this agent, ranked by a
/// [`ProtocolPriority`].
pub trait DataTransports {
    /// Interface handed to the job layer once a protocol has been negotiated.
    type Interface<'a>: DataInterface
    where
        Self: 'a;

    fn priority(&self) -> &ProtocolPriority;

    /// Bind all data operations of the transport for `protocol`, or `None` if
    /// no such transport is part of this set.
    fn bind(&self, protocol: Protocol) -> Option<Self::Interface<'_>>;
}

/// Negotiate the data interface for one job.
///
/// Walks the priority table of `transports` and binds the first protocol whose
/// name occurs in `advertisement`. Lower ranked protocols are never considered
/// once a higher ranked one matches, wherever they appear in the text.
pub fn resolve_data_interface<'a, T: DataTransports>(
    transports: &'a T,
    advertisement: &[u8],
) -> Result<T::Interface<'a>, OtaError> {
    let Some(protocol) = transports.priority().select(advertisement) else {
        warn!(
            "No compiled data protocol ({:?}) in job advertisement {:?}",
            transports.priority().as_slice(),
            core::str::from_utf8(advertisement).unwrap_or("<binary>")
        );
        return Err(OtaError::NoCompatibleProtocol);
    };

    match transports.bind(protocol) {
        Some(interface) => {
            debug!("Negotiated {:?} for file transfer", protocol);
            Ok(interface)
        }
        None => {
            error!("Protocol {:?} ranked but has no transport", protocol);
            Err(OtaError::NoCompatibleProtocol)
        }
    }
}

/// A build with exactly one data transport.
pub struct Single<D> {
    transport: D,
    priority: ProtocolPriority,
}

impl<D: DataInterface> Single<D> {
    pub fn new(transport: D) -> Self {
        let mut list = heapless::Vec::new();
        list.push(transport.protocol()).ok();
        Self {
            priority: ProtocolPriority(list),
            transport,
        }
    }

    pub fn transport(&self) -> &D {
        &self.transport
    }
}

impl<D: DataInterface> DataTransports for Single<D> {
    type Interface<'a>
        = &'a D
    where
        Self: 'a;

    fn priority(&self) -> &ProtocolPriority {
        &self.priority
    }

    fn bind(&self, protocol: Protocol) -> Option<Self::Interface<'_>> {
        (self.transport.protocol() == protocol).then_some(&self.transport)
    }
}

/// A build with two data transports, one of them primary.
pub struct Prioritized<A, B> {
    first: A,
    second: B,
    priority: ProtocolPriority,
}

impl<A: DataInterface, B: DataInterface> Prioritized<A, B> {
    /// Rank `first` and `second` with `primary` on top. Fails if both
    /// transports carry the same protocol or neither carries `primary`.
    pub fn new(first: A, second: B, primary: Protocol) -> Result<Self, ConfigError> {
        let priority = ProtocolPriority::new(primary, &[first.protocol(), second.protocol()])?;
        Ok(Self {
            first,
            second,
            priority,
        })
    }

    /// Rank the transports by the build's [`PRIMARY_DATA_PROTOCOL`].
    pub fn compiled(first: A, second: B) -> Result<Self, ConfigError> {
        Self::new(first, second, PRIMARY_DATA_PROTOCOL)
    }
}

impl<A: DataInterface, B: DataInterface> DataTransports for Prioritized<A, B> {
    type Interface<'a>
        = Selected<'a, A, B>
    where
        Self: 'a;

    fn priority(&self) -> &ProtocolPriority {
        &self.priority
    }

    fn bind(&self, protocol: Protocol) -> Option<Self::Interface<'_>> {
        if self.first.protocol() == protocol {
            Some(Selected::First(&self.first))
        } else if self.second.protocol() == protocol {
            Some(Selected::Second(&self.second))
        } else {
            None
        }
    }
}

/// Data interface bound to one of two transports. Every operation dispatches
/// to the same variant, so operations from different transports never mix.
pub enum Selected<'a, A, B> {
    First(&'a A),
    Second(&'a B),
}

impl<A: DataInterface, B: DataInterface> DataInterface for Selected<'_, A, B> {
    fn protocol(&self) -> Protocol {
        match self {
            Self::First(t) => t.protocol(),
            Self::Second(t) => t.protocol(),
        }
    }

    fn init_file_transfer(&self, file_ctx: &mut FileContext) -> Result<(), TransportError> {
        match self {
            Self::First(t) => t.init_file_transfer(file_ctx),
            Self::Second(t) => t.init_file_transfer(file_ctx),
        }
    }

    fn request_file_block(
        &self,
        file_ctx: &mut FileContext,
        block: u32,
        config: &Config,
    ) -> Result<(), TransportError> {
        match self {
            Self::First(t) => t.request_file_block(file_ctx, block, config),
            Self::Second(t) => t.request_file_block(file_ctx, block, config),
        }
    }

    fn decode_file_block<'c>(
        &self,
        file_ctx: &FileContext,
        payload: &'c [u8],
    ) -> Result<FileBlock<'c>, DecodeError> {
        match self {
            Self::First(t) => t.decode_file_block(file_ctx, payload),
            Self::Second(t) => t.decode_file_block(file_ctx, payload),
        }
    }

    fn cleanup(&self, file_ctx: &mut FileContext, config: &Config) {
        match self {
            Self::First(t) => t.cleanup(file_ctx, config),
            Self::Second(t) => t.cleanup(file_ctx, config),
        }
    }
}
