//! VPC networking, load balancing and hybrid connectivity.

use grid_model::{FieldDescriptor, FilterDescriptor, FlagSource, GridSchema};

use crate::envelope::{name_field, with_envelope};

pub(crate) fn schemas() -> Vec<GridSchema> {
    vec![
        vpc(),
        subnet(),
        security_group(),
        nat_gateway(),
        internet_gateway(),
        elastic_ip(),
        load_balancer(),
        classic_load_balancer(),
        route_table(),
        network_acl(),
        transit_gateway(),
        transit_gateway_attachment(),
        vpc_endpoint(),
        vpc_peering_connection(),
        vpn_connection(),
        direct_connect_connection(),
        direct_connect_virtual_interface(),
    ]
}

fn id(key: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::text(key, label).required().searchable()
}

fn vpc_ref() -> FieldDescriptor {
    FieldDescriptor::text("vpcId", "VPC").searchable()
}

fn truthy(key: &str, label: &str) -> FilterDescriptor {
    FilterDescriptor::flag(key, label, FlagSource::Truthy(key.to_string()))
}

pub fn vpc() -> GridSchema {
    let schema = GridSchema::new("VPC", "VPCs")
        .field(id("vpcId", "VPC ID"))
        .field(name_field("vpcName", "Name"))
        .field(FieldDescriptor::text("cidrBlock", "CIDR").searchable())
        .field(FieldDescriptor::text("state", "State"))
        .field(FieldDescriptor::boolean("isDefault", "Default"))
        .field(FieldDescriptor::boolean("enableDnsHostnames", "DNS Hostnames").hidden())
        .field(FieldDescriptor::boolean("enableDnsSupport", "DNS Support").hidden())
        .field(FieldDescriptor::boolean("flowLogsEnabled", "Flow Logs"))
        .field(FieldDescriptor::text("instanceTenancy", "Tenancy").hidden())
        .filter(FilterDescriptor::exact("state", "State"))
        .filter(truthy("isDefault", "Default VPC"))
        .filter(truthy("flowLogsEnabled", "Flow logs"));
    with_envelope(schema)
}

pub fn subnet() -> GridSchema {
    let schema = GridSchema::new("Subnet", "Subnets")
        .field(id("subnetId", "Subnet ID"))
        .field(name_field("subnetName", "Name"))
        .field(vpc_ref())
        .field(FieldDescriptor::text("cidrBlock", "CIDR").searchable())
        .field(FieldDescriptor::text("availabilityZone", "AZ"))
        .field(FieldDescriptor::text("availabilityZoneId", "AZ ID").hidden())
        .field(FieldDescriptor::text("state", "State"))
        .field(FieldDescriptor::number("availableIpAddressCount", "Free IPs"))
        .field(FieldDescriptor::boolean("defaultForAz", "Default").hidden())
        .field(FieldDescriptor::boolean("mapPublicIpOnLaunch", "Public IP on Launch"))
        .filter(FilterDescriptor::exact("availabilityZone", "AZ"))
        .filter(FilterDescriptor::exact("vpcId", "VPC"))
        .filter(truthy("mapPublicIpOnLaunch", "Public IP on launch"));
    with_envelope(schema)
}

pub fn security_group() -> GridSchema {
    let schema = GridSchema::new("SecurityGroup", "Security Groups")
        .field(id("groupId", "Group ID"))
        .field(FieldDescriptor::text("groupName", "Group Name").searchable())
        .field(FieldDescriptor::text("groupNameTag", "Name Tag").searchable().hidden())
        .field(FieldDescriptor::text("description", "Description").searchable())
        .field(vpc_ref())
        .field(FieldDescriptor::number("ingressRuleCount", "Ingress Rules"))
        .field(FieldDescriptor::number("egressRuleCount", "Egress Rules"))
        .field(FieldDescriptor::boolean("hasExposedIngressPorts", "Exposed Ingress"))
        .field(FieldDescriptor::boolean("allIngressPortsExposed", "All Ports Open"))
        .field(FieldDescriptor::boolean("hasExposedEgressPorts", "Exposed Egress").hidden())
        .filter(FilterDescriptor::exact("vpcId", "VPC"))
        .filter(truthy("hasExposedIngressPorts", "Exposed ingress"))
        .filter(truthy("allIngressPortsExposed", "All ports open"));
    with_envelope(schema)
}

pub fn nat_gateway() -> GridSchema {
    let schema = GridSchema::new("NATGateway", "NAT Gateways")
        .field(id("natGatewayId", "NAT Gateway ID"))
        .field(name_field("natGatewayName", "Name"))
        .field(FieldDescriptor::text("state", "State"))
        .field(vpc_ref())
        .field(FieldDescriptor::text("subnetId", "Subnet").searchable())
        .field(FieldDescriptor::text("connectivityType", "Connectivity"))
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("state", "State"))
        .filter(FilterDescriptor::exact("connectivityType", "Connectivity"));
    with_envelope(schema)
}

pub fn internet_gateway() -> GridSchema {
    let schema = GridSchema::new("InternetGateway", "Internet Gateways")
        .field(id("internetGatewayId", "Gateway ID"))
        .field(name_field("internetGatewayName", "Name"))
        .field(FieldDescriptor::number("attachmentCount", "Attachments"))
        .filter(FilterDescriptor::flag(
            "attached",
            "Attached",
            FlagSource::Truthy("attachmentCount".into()),
        ));
    with_envelope(schema)
}

pub fn elastic_ip() -> GridSchema {
    let schema = GridSchema::new("ElasticIP", "Elastic IPs")
        .field(id("allocationId", "Allocation ID"))
        .field(name_field("eipName", "Name"))
        .field(FieldDescriptor::text("publicIp", "Public IP").searchable())
        .field(FieldDescriptor::text("privateIpAddress", "Private IP").searchable())
        .field(FieldDescriptor::text("instanceId", "Instance").searchable())
        .field(FieldDescriptor::text("networkInterfaceId", "ENI").hidden())
        .field(FieldDescriptor::text("associationId", "Association").hidden())
        .field(FieldDescriptor::text("domain", "Domain").hidden())
        .field(FieldDescriptor::text("networkBorderGroup", "Border Group").hidden())
        .filter(FilterDescriptor::flag(
            "associated",
            "Associated",
            FlagSource::custom(|record| crate::envelope::has_text(record, "associationId")),
        ));
    with_envelope(schema)
}

pub fn load_balancer() -> GridSchema {
    let schema = GridSchema::new("LoadBalancer", "Load Balancers")
        .field(id("loadBalancerName", "Load Balancer"))
        .field(FieldDescriptor::text("loadBalancerNameTag", "Name Tag").searchable().hidden())
        .field(FieldDescriptor::text("loadBalancerArn", "ARN").hidden())
        .field(FieldDescriptor::text("type", "Type"))
        .field(FieldDescriptor::text("scheme", "Scheme"))
        .field(FieldDescriptor::text("state", "State"))
        .field(FieldDescriptor::text("dnsName", "DNS Name").searchable().min_width(30))
        .field(FieldDescriptor::text("canonicalHostedZoneId", "Hosted Zone").hidden())
        .field(vpc_ref())
        .field(FieldDescriptor::text("ipAddressType", "IP Type").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("type", "Type"))
        .filter(FilterDescriptor::exact("scheme", "Scheme"))
        .filter(FilterDescriptor::exact("state", "State"));
    with_envelope(schema)
}

pub fn classic_load_balancer() -> GridSchema {
    let schema = GridSchema::new("ClassicLoadBalancer", "Classic Load Balancers")
        .field(id("loadBalancerName", "Load Balancer"))
        .field(FieldDescriptor::text("loadBalancerNameTag", "Name Tag").searchable().hidden())
        .field(FieldDescriptor::text("dnsName", "DNS Name").searchable().min_width(30))
        .field(FieldDescriptor::text("canonicalHostedZoneName", "Hosted Zone").hidden())
        .field(FieldDescriptor::text("canonicalHostedZoneNameId", "Hosted Zone ID").hidden())
        .field(FieldDescriptor::text("scheme", "Scheme"))
        .field(vpc_ref())
        .field(FieldDescriptor::number("instanceCount", "Instances"))
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("scheme", "Scheme"))
        .filter(FilterDescriptor::flag(
            "idle",
            "No instances",
            FlagSource::custom(|record| !record.get("instanceCount").is_truthy()),
        ));
    with_envelope(schema)
}

pub fn route_table() -> GridSchema {
    let schema = GridSchema::new("RouteTable", "Route Tables")
        .field(id("routeTableId", "Route Table ID"))
        .field(name_field("routeTableName", "Name"))
        .field(vpc_ref())
        .field(FieldDescriptor::number("routeCount", "Routes"))
        .field(FieldDescriptor::boolean("hasInternetRoute", "Internet Route"))
        .field(FieldDescriptor::boolean("hasNatRoute", "NAT Route"))
        .field(FieldDescriptor::boolean("hasVpcPeeringRoute", "Peering Route").hidden())
        .field(FieldDescriptor::number("associationCount", "Associations"))
        .field(FieldDescriptor::boolean("isMain", "Main"))
        .filter(FilterDescriptor::exact("vpcId", "VPC"))
        .filter(truthy("hasInternetRoute", "Internet route"))
        .filter(truthy("isMain", "Main table"));
    with_envelope(schema)
}

pub fn network_acl() -> GridSchema {
    let schema = GridSchema::new("NetworkACL", "Network ACLs")
        .field(id("networkAclId", "ACL ID"))
        .field(name_field("networkAclName", "Name"))
        .field(vpc_ref())
        .field(FieldDescriptor::boolean("isDefault", "Default"))
        .field(FieldDescriptor::number("ingressRuleCount", "Ingress Rules"))
        .field(FieldDescriptor::number("egressRuleCount", "Egress Rules"))
        .field(FieldDescriptor::number("customDenyRuleCount", "Deny Rules"))
        .field(FieldDescriptor::number("associationCount", "Associations"))
        .filter(FilterDescriptor::exact("vpcId", "VPC"))
        .filter(truthy("isDefault", "Default ACL"));
    with_envelope(schema)
}

pub fn transit_gateway() -> GridSchema {
    let schema = GridSchema::new("TransitGateway", "Transit Gateways")
        .field(id("transitGatewayId", "Transit Gateway ID"))
        .field(name_field("transitGatewayName", "Name"))
        .field(FieldDescriptor::text("state", "State"))
        .field(FieldDescriptor::text("ownerId", "Owner"))
        .field(FieldDescriptor::text("description", "Description").searchable().hidden())
        .field(FieldDescriptor::number("amazonSideAsn", "ASN"))
        .field(FieldDescriptor::text("dnsSupport", "DNS Support").hidden())
        .field(FieldDescriptor::text("vpnEcmpSupport", "VPN ECMP").hidden())
        .field(FieldDescriptor::text("defaultRouteTableAssociation", "Default Association").hidden())
        .field(FieldDescriptor::text("defaultRouteTablePropagation", "Default Propagation").hidden())
        .field(FieldDescriptor::text("multicastSupport", "Multicast").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("state", "State"));
    with_envelope(schema)
}

pub fn transit_gateway_attachment() -> GridSchema {
    let schema = GridSchema::new("TransitGatewayAttachment", "Transit Gateway Attachments")
        .field(id("transitGatewayAttachmentId", "Attachment ID"))
        .field(name_field("attachmentName", "Name"))
        .field(FieldDescriptor::text("transitGatewayId", "Transit Gateway").searchable())
        .field(FieldDescriptor::text("transitGatewayOwnerId", "Gateway Owner").hidden())
        .field(FieldDescriptor::text("attachedResourceType", "Resource Type"))
        .field(FieldDescriptor::text("attachedResourceId", "Resource").searchable())
        .field(FieldDescriptor::text("resourceOwnerId", "Resource Owner").hidden())
        .field(FieldDescriptor::text("state", "State"))
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("attachedResourceType", "Resource type"))
        .filter(FilterDescriptor::exact("state", "State"));
    with_envelope(schema)
}

pub fn vpc_endpoint() -> GridSchema {
    let schema = GridSchema::new("VPCEndpoint", "VPC Endpoints")
        .field(id("vpcEndpointId", "Endpoint ID"))
        .field(name_field("vpcEndpointName", "Name"))
        .field(vpc_ref())
        .field(FieldDescriptor::text("serviceName", "Service").searchable())
        .field(FieldDescriptor::text("vpcEndpointType", "Type"))
        .field(FieldDescriptor::text("state", "State"))
        .field(FieldDescriptor::boolean("privateDnsEnabled", "Private DNS"))
        .field(FieldDescriptor::nested("policyDocument", "Policy").hidden())
        .field(FieldDescriptor::timestamp("createdAt", "Created"))
        .filter(FilterDescriptor::exact("vpcEndpointType", "Type"))
        .filter(FilterDescriptor::flag(
            "customPolicy",
            "Has policy",
            FlagSource::NonEmpty("policyDocument".into()),
        ));
    with_envelope(schema)
}

pub fn vpc_peering_connection() -> GridSchema {
    let schema = GridSchema::new("VPCPeeringConnection", "VPC Peering Connections")
        .field(id("vpcPeeringConnectionId", "Peering ID"))
        .field(name_field("peeringConnectionName", "Name"))
        .field(FieldDescriptor::text("status", "Status"))
        .field(FieldDescriptor::text("statusMessage", "Message").hidden())
        .field(FieldDescriptor::text("requesterVpcId", "Requester VPC").searchable())
        .field(FieldDescriptor::text("requesterRegion", "Requester Region").hidden())
        .field(FieldDescriptor::text("requesterOwnerId", "Requester Owner").hidden())
        .field(FieldDescriptor::text("accepterVpcId", "Accepter VPC").searchable())
        .field(FieldDescriptor::text("accepterRegion", "Accepter Region").hidden())
        .field(FieldDescriptor::text("accepterOwnerId", "Accepter Owner").hidden())
        .filter(FilterDescriptor::exact("status", "Status"))
        .filter(FilterDescriptor::flag(
            "crossAccount",
            "Cross-account",
            FlagSource::custom(|record| {
                let requester = record.text("requesterOwnerId");
                let accepter = record.text("accepterOwnerId");
                !requester.is_empty() && !accepter.is_empty() && requester != accepter
            }),
        ));
    with_envelope(schema)
}

pub fn vpn_connection() -> GridSchema {
    let schema = GridSchema::new("VPNConnection", "VPN Connections")
        .field(id("vpnConnectionId", "VPN ID"))
        .field(name_field("vpnConnectionName", "Name"))
        .field(FieldDescriptor::text("state", "State"))
        .field(FieldDescriptor::text("type", "Type").hidden())
        .field(FieldDescriptor::text("customerGatewayId", "Customer Gateway").searchable())
        .field(FieldDescriptor::text("vpnGatewayId", "VPN Gateway").hidden())
        .field(FieldDescriptor::text("transitGatewayId", "Transit Gateway").hidden())
        .field(FieldDescriptor::text("category", "Category").hidden())
        .field(FieldDescriptor::number("tunnelCount", "Tunnels"))
        .field(FieldDescriptor::number("tunnelsUp", "Tunnels Up"))
        .filter(FilterDescriptor::exact("state", "State"))
        .filter(FilterDescriptor::flag(
            "degraded",
            "Tunnel down",
            FlagSource::custom(|record| {
                match (
                    record.get("tunnelsUp").as_number(),
                    record.get("tunnelCount").as_number(),
                ) {
                    (Some(up), Some(total)) => up < total,
                    _ => false,
                }
            }),
        ));
    with_envelope(schema)
}

pub fn direct_connect_connection() -> GridSchema {
    let schema = GridSchema::new("DirectConnectConnection", "Direct Connect Connections")
        .field(id("connectionId", "Connection ID"))
        .field(name_field("connectionName", "Name"))
        .field(FieldDescriptor::text("connectionState", "State"))
        .field(FieldDescriptor::text("location", "Location"))
        .field(FieldDescriptor::text("bandwidth", "Bandwidth"))
        .field(FieldDescriptor::number("vlan", "VLAN").hidden())
        .field(FieldDescriptor::text("partnerName", "Partner").searchable())
        .field(FieldDescriptor::timestamp("loaIssueTime", "LOA Issued").hidden())
        .field(FieldDescriptor::text("lagId", "LAG").hidden())
        .field(FieldDescriptor::text("awsDevice", "AWS Device").hidden())
        .field(FieldDescriptor::text("hasLogicalRedundancy", "Redundancy").hidden())
        .field(FieldDescriptor::boolean("macSecCapable", "MACsec"))
        .field(FieldDescriptor::text("portEncryptionStatus", "Port Encryption").hidden())
        .field(FieldDescriptor::text("encryptionMode", "Encryption Mode").hidden())
        .filter(FilterDescriptor::exact("connectionState", "State"))
        .filter(FilterDescriptor::exact("location", "Location"));
    with_envelope(schema)
}

pub fn direct_connect_virtual_interface() -> GridSchema {
    let schema = GridSchema::new("DirectConnectVirtualInterface", "Direct Connect Interfaces")
        .field(id("virtualInterfaceId", "Interface ID"))
        .field(name_field("virtualInterfaceName", "Name"))
        .field(FieldDescriptor::text("connectionId", "Connection").searchable())
        .field(FieldDescriptor::text("virtualInterfaceType", "Type"))
        .field(FieldDescriptor::text("virtualInterfaceState", "State"))
        .field(FieldDescriptor::text("customerAddress", "Customer Address").hidden())
        .field(FieldDescriptor::text("amazonAddress", "Amazon Address").hidden())
        .field(FieldDescriptor::number("vlan", "VLAN"))
        .field(FieldDescriptor::number("asn", "ASN"))
        .field(FieldDescriptor::number("amazonSideAsn", "Amazon ASN").hidden())
        .field(FieldDescriptor::number("mtu", "MTU"))
        .field(FieldDescriptor::boolean("jumboFrameCapable", "Jumbo Frames").hidden())
        .field(FieldDescriptor::text("virtualGatewayId", "Virtual Gateway").hidden())
        .field(FieldDescriptor::text("directConnectGatewayId", "DX Gateway").hidden())
        .filter(FilterDescriptor::exact("virtualInterfaceType", "Type"))
        .filter(FilterDescriptor::exact("virtualInterfaceState", "State"));
    with_envelope(schema)
}
