use serde::Serialize;

/// What an outbound link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkKind {
    Email,
    Phone,
    Scheduling,
    ProfessionalNetwork,
    Maps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutboundLink {
    pub kind: LinkKind,
    pub href: &'static str,
    pub label: &'static str,
    /// Opened in a new browsing context
    pub external: bool,
}

const LINKS: [OutboundLink; 5] = [
    OutboundLink {
        kind: LinkKind::Email,
        href: "mailto:diallotafsir52@gmail.com",
        label: "Email Contact",
        external: true,
    },
    OutboundLink {
        kind: LinkKind::Phone,
        href: "tel:+221781453881",
        label: "WhatsApp Contact",
        external: true,
    },
    OutboundLink {
        kind: LinkKind::Scheduling,
        href: "https://calendly.com/diallotafsir52/30min",
        label: "Schedule a Call",
        external: true,
    },
    OutboundLink {
        kind: LinkKind::ProfessionalNetwork,
        href: "https://www.linkedin.com/in/diallotafsir52/",
        label: "LinkedIn Profile",
        external: true,
    },
    OutboundLink {
        kind: LinkKind::Maps,
        href: "https://maps.google.com/?q=Dakar,Senegal",
        label: "Location",
        external: true,
    },
];

/// Every outbound link of the page, in display order.
#[must_use]
pub const fn outbound_links() -> &'static [OutboundLink] {
    &LINKS
}
